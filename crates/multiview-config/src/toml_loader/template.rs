//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Multiview Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[defaults]
# Applied to createWebview when the caller leaves an option out.
# auto_focus = true
# javascript = true
# file_access = false
# user_agent = "MyApp/1.0"
# background = "#ffffff"   # #rrggbb or #rrggbbaa

[service]
# event_capacity = 256     # 1-65536

[logging]
# level = "multiview=info"
"##
    .to_string()
}
