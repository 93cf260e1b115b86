// Dataset compiled into the binary, used when no dataset directory is set.

pub const GUIDELINES_JSON: &str = include_str!("../../data/guidelines.json");
pub const CONFIGS_JS: &str = include_str!("../../data/configs.js");

pub const TEMPLATES: &[(&str, &str)] = &[
    ("apache", include_str!("../../data/templates/apache.hbs")),
    ("awselb", include_str!("../../data/templates/awselb.hbs")),
    ("caddy", include_str!("../../data/templates/caddy.hbs")),
    ("dovecot", include_str!("../../data/templates/dovecot.hbs")),
    ("go", include_str!("../../data/templates/go.hbs")),
    ("haproxy", include_str!("../../data/templates/haproxy.hbs")),
    ("lighttpd", include_str!("../../data/templates/lighttpd.hbs")),
    ("nginx", include_str!("../../data/templates/nginx.hbs")),
    ("postfix", include_str!("../../data/templates/postfix.hbs")),
    ("postgresql", include_str!("../../data/templates/postgresql.hbs")),
    ("traefik", include_str!("../../data/templates/traefik.hbs")),
];

/// Mozilla hosts the RFC 7919 groups next to the web generator.
pub const DH_PARAMS_URL: &str = "https://ssl-config.mozilla.org";
