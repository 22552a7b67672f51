// src/webdriver/locator.rs

use std::fmt;
use std::str::FromStr;

/// An element lookup strategy plus its selector.
///
/// Written in configuration as `<strategy>:<selector>`:
///
/// ```toml
/// username_field = "id:usernameField"
/// submit_button = "xpath://button[@type='submit']"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Css(String),
    XPath(String),
}

impl Locator {
    /// The `(using, value)` pair sent in a W3C find-element request.
    ///
    /// W3C dropped the `id` strategy, so ids are rewritten as an attribute
    /// CSS selector.
    pub fn to_w3c(&self) -> (&'static str, String) {
        match self {
            Locator::Id(id) => ("css selector", format!("[id=\"{}\"]", id.replace('"', "\\\""))),
            Locator::Css(css) => ("css selector", css.clone()),
            Locator::XPath(xpath) => ("xpath", xpath.clone()),
        }
    }
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (strategy, selector) = s
            .split_once(':')
            .ok_or_else(|| format!("locator '{s}' is missing a strategy prefix (id:, css:, xpath:)"))?;

        if selector.trim().is_empty() {
            return Err(format!("locator '{s}' has an empty selector"));
        }

        match strategy.trim().to_lowercase().as_str() {
            "id" => Ok(Locator::Id(selector.to_string())),
            "css" => Ok(Locator::Css(selector.to_string())),
            "xpath" => Ok(Locator::XPath(selector.to_string())),
            other => Err(format!(
                "unknown locator strategy '{other}' in '{s}' (expected id, css or xpath)"
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id:{v}"),
            Locator::Css(v) => write!(f, "css:{v}"),
            Locator::XPath(v) => write!(f, "xpath:{v}"),
        }
    }
}
