//! Helpers available to server templates.
//!
//! Every helper returns a JSON value so it can be used both as a mustache
//! (`{{join output.ciphers ":"}}`) and as a subexpression
//! (`{{#if (minver "1.25.1" form.serverVersion)}}`).

use handlebars::{
    Context, Handlebars, Helper, HelperDef, JsonRender, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde_json::Value as Json;

use crate::version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateHelper {
    Eq,
    Includes,
    Join,
    Last,
    MinPatchVer,
    MinVer,
    Replace,
    Reverse,
    SameMinorVer,
    Split,
}

impl TemplateHelper {
    pub const ALL: [TemplateHelper; 10] = [
        TemplateHelper::Eq,
        TemplateHelper::Includes,
        TemplateHelper::Join,
        TemplateHelper::Last,
        TemplateHelper::MinPatchVer,
        TemplateHelper::MinVer,
        TemplateHelper::Replace,
        TemplateHelper::Reverse,
        TemplateHelper::SameMinorVer,
        TemplateHelper::Split,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateHelper::Eq => "eq",
            TemplateHelper::Includes => "includes",
            TemplateHelper::Join => "join",
            TemplateHelper::Last => "last",
            TemplateHelper::MinPatchVer => "minpatchver",
            TemplateHelper::MinVer => "minver",
            TemplateHelper::Replace => "replace",
            TemplateHelper::Reverse => "reverse",
            TemplateHelper::SameMinorVer => "sameminorver",
            TemplateHelper::Split => "split",
        }
    }

    fn param<'a>(&self, params: &[&'a Json], index: usize) -> Result<&'a Json, RenderErrorReason> {
        params
            .get(index)
            .copied()
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(self.name(), index))
    }

    fn text<'a>(&self, params: &[&'a Json], index: usize) -> Result<&'a str, RenderErrorReason> {
        self.param(params, index)?
            .as_str()
            .ok_or(RenderErrorReason::InvalidParamType("Expected a string"))
    }

    fn array<'a>(&self, params: &[&'a Json], index: usize) -> Result<&'a [Json], RenderErrorReason> {
        self.param(params, index)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or(RenderErrorReason::InvalidParamType("Expected an array"))
    }

    /// Versions may come through as JSON numbers (`sstls.version`).
    fn version(&self, params: &[&Json], index: usize) -> Result<String, RenderErrorReason> {
        match self.param(params, index)? {
            Json::String(x) => Ok(x.clone()),
            Json::Number(x) => Ok(x.to_string()),
            _ => Err(RenderErrorReason::InvalidParamType("Expected a version")),
        }
    }

    /// Evaluates the helper against its positional parameters.
    pub fn apply(&self, params: &[&Json]) -> Result<Json, RenderErrorReason> {
        let value = match self {
            TemplateHelper::Eq => Json::Bool(self.param(params, 0)? == self.param(params, 1)?),
            TemplateHelper::Includes => {
                let item = self.param(params, 0)?;

                let found = match self.param(params, 1)? {
                    Json::Array(items) => items.contains(item),
                    Json::String(haystack) => item
                        .as_str()
                        .map(|needle| haystack.contains(needle))
                        .ok_or(RenderErrorReason::InvalidParamType("Expected a string"))?,
                    _ => {
                        return Err(RenderErrorReason::InvalidParamType(
                            "Expected a string or an array",
                        ));
                    }
                };

                Json::Bool(found)
            }
            TemplateHelper::Join => {
                let items = self.array(params, 0)?;
                let separator = self.text(params, 1)?;

                let parts: Vec<_> = items.iter().map(|x| x.render()).collect();

                Json::String(parts.join(separator))
            }
            TemplateHelper::Last => self.array(params, 0)?.last().cloned().unwrap_or(Json::Null),
            TemplateHelper::MinPatchVer => Json::Bool(version::is_minimum_patch(
                &self.version(params, 0)?,
                &self.version(params, 1)?,
            )),
            TemplateHelper::MinVer => Json::Bool(version::is_minimum(
                &self.version(params, 0)?,
                &self.version(params, 1)?,
            )),
            TemplateHelper::Replace => {
                let text = self.text(params, 0)?;
                let from = self.text(params, 1)?;
                let to = self.text(params, 2)?;

                Json::String(text.replace(from, to))
            }
            TemplateHelper::Reverse => {
                Json::Array(self.array(params, 0)?.iter().rev().cloned().collect())
            }
            TemplateHelper::SameMinorVer => Json::Bool(version::is_same_minor(
                &self.version(params, 0)?,
                &self.version(params, 1)?,
            )),
            TemplateHelper::Split => {
                let text = self.text(params, 0)?;
                let separator = self.text(params, 1)?;

                Json::Array(
                    text.split(separator)
                        .map(|x| Json::String(x.to_string()))
                        .collect(),
                )
            }
        };

        Ok(value)
    }
}

impl HelperDef for TemplateHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let params: Vec<&Json> = h.params().iter().map(|x| x.value()).collect();

        let value = self.apply(&params)?;

        Ok(ScopedJson::Derived(value))
    }
}

pub fn register(handlebars: &mut Handlebars<'_>) {
    for helper in TemplateHelper::ALL {
        handlebars.register_helper(helper.name(), Box::new(helper));
    }
}
