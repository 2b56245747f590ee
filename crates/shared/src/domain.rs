use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EntityId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LangCode {
    #[default]
    En,
    Vi,
}

impl LangCode {
    pub const ALL: [LangCode; 2] = [LangCode::En, LangCode::Vi];

    pub fn as_str(self) -> &'static str {
        match self {
            LangCode::En => "en",
            LangCode::Vi => "vi",
        }
    }

    /// Accepts bare codes as well as POSIX and BCP-47 tags
    /// (`vi`, `vi-VN`, `vi_VN.UTF-8`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(LangCode::En),
            "vi" => Some(LangCode::Vi),
            _ => None,
        }
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LangCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported language code '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posix_and_bcp47_tags() {
        assert_eq!(LangCode::from_tag("vi_VN.UTF-8"), Some(LangCode::Vi));
        assert_eq!(LangCode::from_tag("en-US"), Some(LangCode::En));
        assert_eq!(LangCode::from_tag("ja"), None);
        assert_eq!("VI".parse::<LangCode>(), Ok(LangCode::Vi));
    }
}
