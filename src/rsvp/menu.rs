use serde::Serialize;

/// Free-text spellings we accept for the vegetarian menu.
const VEGGIE_ALIASES: [&str; 5] = ["veggie", "vegan", "vegano", "vegetariano", "vegetal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Menu {
    Standard,
    Veggie,
}

impl Menu {
    pub fn as_str(self) -> &'static str {
        match self {
            Menu::Standard => "standard",
            Menu::Veggie => "veggie",
        }
    }
}

/// Maps free-text menu/dietary input to the canonical menu. Unrecognized
/// input maps to `None`, same as "not provided"; the call site decides
/// whether that is an error.
pub fn normalize(raw: Option<&str>) -> Option<Menu> {
    let v = raw?.trim().to_lowercase();
    if v.is_empty() {
        return None;
    }
    if VEGGIE_ALIASES.contains(&v.as_str()) {
        return Some(Menu::Veggie);
    }
    if v == "standard" {
        return Some(Menu::Standard);
    }
    None
}

/// The public form's attendance flag: "si" or "no", nothing else.
pub fn parse_attendance(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "si" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
