use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub background: Option<String>,
    pub user_prefix: Option<String>,
    pub user_text: Option<String>,
    pub assistant_text: Option<String>,
    pub title: Option<String>,
    pub indicator: Option<String>,
    pub placeholder: Option<String>,
    pub input_border: Option<String>,
    pub input_title: Option<String>,
    pub input_text: Option<String>,
    pub error_banner: Option<String>,
    pub sources_heading: Option<String>,
    pub source_title: Option<String>,
    pub source_link: Option<String>,
    pub heading: Option<String>,
    pub inline_code: Option<String>,
    pub code_block: Option<String>,
    pub code_block_background: Option<String>,
    pub link: Option<String>,
    pub list_marker: Option<String>,
    pub blockquote: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
}

pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_themes.toml");
    match toml::from_str::<BuiltinThemesConfig>(CONFIG_CONTENT) {
        Ok(config) => config.themes,
        Err(err) => {
            warn!(error = %err, "failed to parse builtin_themes.toml");
            Vec::new()
        }
    }
}

pub fn find_builtin_theme(id: &str) -> Option<ThemeSpec> {
    load_builtin_themes()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}
