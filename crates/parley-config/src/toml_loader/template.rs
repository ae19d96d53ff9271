//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "127.0.0.1"
# port = 8000               # 1-65535
# cors_permissive = true

[model]
# name = "gemini-pro"
# api_base = "https://generativelanguage.googleapis.com/v1beta"
# max_tokens = 2048         # 1-65536
# temperature = 0.9         # 0.0-2.0
# system_prompt = "You are a helpful assistant."
# stream = true
# request_timeout_secs = 60 # 1-600
# api_key_env = "GENAI_API_KEY"

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
