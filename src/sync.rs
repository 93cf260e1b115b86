//! Refreshes a dataset directory from a checkout of the upstream
//! `ssl-config-generator` repository.

use std::{
    collections::BTreeMap,
    fmt::Display,
    path::{Path, PathBuf},
    process::Command,
};

use cryptoxide::{digest::Digest as _, sha2::Sha256};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    catalog::{CONFIGS_FILE, GUIDELINES_FILE, TEMPLATE_EXTENSION, TEMPLATES_DIR},
    version::{PrereleasePolicy, Version},
};

/// Template partials that are page fragments of the web generator.
const SKIPPED_PARTIALS: &[&str] = &["header.hbs", "nosupport.hbs"];

const DH_PARAM_SIZES: [u32; 2] = [2048, 4096];

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("can't read {}", path.display())]
    CantRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't write {}", path.display())]
    CantWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no guideline document in {}", .0.display())]
    #[diagnostic(help(
        "The source must be the `src` directory of an ssl-config-generator checkout"
    ))]
    NoGuidelines(PathBuf),

    #[error("can't run git in {}", dir.display())]
    CantRunGit {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git pull failed in {}", .0.display())]
    GitPullFailed(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
    Removed,
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Created => write!(f, "created"),
            Change::Updated => write!(f, "updated"),
            Change::Removed => write!(f, "removed"),
        }
    }
}

fn cant_read(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::CantRead {
        path: path.to_path_buf(),
        source,
    }
}

fn cant_write(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::CantWrite {
        path: path.to_path_buf(),
        source,
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(cant_read(dir))? {
        paths.push(entry.map_err(cant_read(dir))?.path());
    }

    paths.sort();

    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|x| x.to_str())
}

fn digest(path: &Path) -> Result<String, Error> {
    let data = std::fs::read(path).map_err(cant_read(path))?;

    let mut hasher = Sha256::new();
    hasher.input(&data);

    Ok(hasher.result_str())
}

pub fn git_pull(dir: &Path) -> Result<(), Error> {
    let output = Command::new("git")
        .arg("pull")
        .current_dir(dir)
        .output()
        .map_err(|source| Error::CantRunGit {
            dir: dir.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::GitPullFailed(dir.to_path_buf()));
    }

    Ok(())
}

/// The newest `static/guidelines/<version>.json`, ordered by version.
pub fn latest_guidelines(source: &Path) -> Result<PathBuf, Error> {
    let dir = source.join("static").join("guidelines");

    if !dir.is_dir() {
        return Err(Error::NoGuidelines(dir));
    }

    list_dir(&dir)?
        .into_iter()
        .filter(|path| path.extension().and_then(|x| x.to_str()) == Some("json"))
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;

            if stem == "latest" {
                return None;
            }

            let version = Version::parse(stem, PrereleasePolicy::Highest);

            Some((version, path))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
        .ok_or(Error::NoGuidelines(dir))
}

/// Maps each dataset file (relative, `/` separated) to its upstream source.
pub fn upstream_files(source: &Path) -> Result<BTreeMap<String, PathBuf>, Error> {
    let mut files = BTreeMap::new();

    files.insert(GUIDELINES_FILE.to_string(), latest_guidelines(source)?);
    files.insert(CONFIGS_FILE.to_string(), source.join("js").join(CONFIGS_FILE));

    for size in DH_PARAM_SIZES {
        let name = format!("ffdhe{}.txt", size);
        files.insert(name.clone(), source.join("static").join(name));
    }

    let partials = source.join("templates").join("partials");

    for path in list_dir(&partials)? {
        let Some(name) = file_name(&path) else {
            continue;
        };

        let is_template = path.extension().and_then(|x| x.to_str()) == Some(TEMPLATE_EXTENSION);

        if !is_template || SKIPPED_PARTIALS.contains(&name) {
            continue;
        }

        files.insert(format!("{}/{}", TEMPLATES_DIR, name), path.clone());
    }

    Ok(files)
}

fn collect_manifest(
    root: &Path,
    dir: &Path,
    manifest: &mut BTreeMap<String, String>,
) -> Result<(), Error> {
    for path in list_dir(dir)? {
        if path.is_dir() {
            if dir == root && file_name(&path) == Some(TEMPLATES_DIR) {
                collect_manifest(root, &path, manifest)?;
            }
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|x| x.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if is_dataset_file(&relative) {
            manifest.insert(relative, digest(&path)?);
        }
    }

    Ok(())
}

/// Whether a relative path is one `update` owns. Anything else in the
/// destination is left alone.
fn is_dataset_file(relative: &str) -> bool {
    match relative.split('/').collect::<Vec<_>>().as_slice() {
        [name] => {
            *name == GUIDELINES_FILE
                || *name == CONFIGS_FILE
                || (name.starts_with("ffdhe") && name.ends_with(".txt"))
        }
        [dir, name] => {
            *dir == TEMPLATES_DIR
                && Path::new(name).extension().and_then(|x| x.to_str()) == Some(TEMPLATE_EXTENSION)
        }
        _ => false,
    }
}

/// SHA-256 digest of every dataset file under `dir`, keyed by relative path.
pub fn manifest(dir: &Path) -> Result<BTreeMap<String, String>, Error> {
    let mut manifest = BTreeMap::new();

    if dir.exists() {
        collect_manifest(dir, dir, &mut manifest)?;
    }

    Ok(manifest)
}

/// Brings `dest` in line with the upstream checkout at `source`.
pub fn update(source: &Path, dest: &Path, pull: bool) -> Result<BTreeMap<String, Change>, Error> {
    if pull {
        debug!(dir = %source.display(), "pulling upstream repository");
        git_pull(source)?;
    }

    let files = upstream_files(source)?;

    let templates = dest.join(TEMPLATES_DIR);
    std::fs::create_dir_all(&templates).map_err(cant_write(&templates))?;

    let existing = manifest(dest)?;
    let mut changes = BTreeMap::new();

    for (target, origin) in files.iter() {
        let current = existing.get(target);

        if current == Some(&digest(origin)?) {
            continue;
        }

        let path = dest.join(target);
        std::fs::copy(origin, &path).map_err(cant_write(&path))?;

        let change = match current {
            Some(_) => Change::Updated,
            None => Change::Created,
        };

        info!(file = %target, %change, "dataset file synced");
        changes.insert(target.clone(), change);
    }

    for stale in existing.keys().filter(|x| !files.contains_key(*x)) {
        let path = dest.join(stale);
        std::fs::remove_file(&path).map_err(cant_write(&path))?;

        info!(file = %stale, "dataset file removed");
        changes.insert(stale.clone(), Change::Removed);
    }

    Ok(changes)
}
