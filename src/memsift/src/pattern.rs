//! Search patterns
//!
//! A pattern is a compiled byte regex plus where it came from. Patterns are
//! either given ad hoc on the command line or taken from the built-in catalog
//! of secret-detection rules; the scanner treats both the same way.

use regex::bytes::{Regex, RegexBuilder};
use std::fmt;

use crate::error::Result;

pub const CATALOG_SOURCE: &str = "built-in catalog";

/// A named regular expression run against raw process memory
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    name: String,
    source: String,
}

impl Pattern {
    /// Compile `expression` with Unicode mode off, so `.` and negated classes
    /// match any single byte of raw memory, valid UTF-8 or not.
    pub fn new(name: impl Into<String>, source: impl Into<String>, expression: &str) -> Result<Self> {
        Ok(Pattern {
            regex: RegexBuilder::new(expression).unicode(false).build()?,
            name: name.into(),
            source: source.into(),
        })
    }

    /// A user-supplied expression with no name
    pub fn adhoc(expression: &str) -> Result<Self> {
        Self::new("", "command line", expression)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(self.regex.as_str())
        } else {
            write!(f, "{} (pattern from {})", self.name, self.source)
        }
    }
}

/// One entry of the built-in secret catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogRule {
    pub name: &'static str,
    pub expression: &'static str,
}

/// Secret-detection rules shipped with memsift
pub const CATALOG: &[CatalogRule] = &[
    CatalogRule {
        name: "AWS Access Key ID",
        expression: r"(A3T[A-Z0-9]|AKIA|AGPA|AIDA|AROA|AIPA|ANPA|ANVA|ASIA)[A-Z0-9]{16}",
    },
    CatalogRule {
        name: "AWS Secret Access Key",
        expression: r#"(?i)aws_?secret_?access_?key['"]?\s*[:=]\s*['"]?[A-Za-z0-9/+=]{40}"#,
    },
    CatalogRule {
        name: "GitHub Token",
        expression: r"gh[pousr]_[A-Za-z0-9]{36,255}",
    },
    CatalogRule {
        name: "GitHub Fine-Grained Token",
        expression: r"github_pat_[A-Za-z0-9_]{82}",
    },
    CatalogRule {
        name: "Slack Token",
        expression: r"xox[baprs]-[0-9A-Za-z-]{10,72}",
    },
    CatalogRule {
        name: "Slack Webhook",
        expression: r"https://hooks\.slack\.com/services/T[A-Za-z0-9_]{8,}/B[A-Za-z0-9_]{8,}/[A-Za-z0-9_]{24}",
    },
    CatalogRule {
        name: "Private Key",
        expression: r"-----BEGIN ((EC|PGP|DSA|RSA|OPENSSH|ENCRYPTED) )?PRIVATE KEY( BLOCK)?-----",
    },
    CatalogRule {
        name: "Google API Key",
        expression: r"AIza[0-9A-Za-z_\-]{35}",
    },
    CatalogRule {
        name: "Stripe Secret Key",
        expression: r"(sk|rk)_live_[0-9a-zA-Z]{24,99}",
    },
    CatalogRule {
        name: "Twilio API Key",
        expression: r"SK[0-9a-fA-F]{32}",
    },
    CatalogRule {
        name: "SendGrid API Key",
        expression: r"SG\.[A-Za-z0-9_\-]{22}\.[A-Za-z0-9_\-]{43}",
    },
    CatalogRule {
        name: "Mailgun API Key",
        expression: r"key-[0-9a-zA-Z]{32}",
    },
    CatalogRule {
        name: "NPM Access Token",
        expression: r"npm_[A-Za-z0-9]{36}",
    },
    CatalogRule {
        name: "JSON Web Token",
        expression: r"eyJ[A-Za-z0-9_\-]{10,}\.eyJ[A-Za-z0-9_\-]{10,}\.[A-Za-z0-9_\-]{10,}",
    },
    CatalogRule {
        name: "Credentials in URL",
        expression: r#"[a-zA-Z][a-zA-Z0-9+.\-]{2,15}://[^/\s:@'"]{3,32}:[^/\s:@'"]{3,64}@[^\s'"/]+"#,
    },
    CatalogRule {
        name: "Password Assignment",
        expression: r#"(?i)(password|passwd|pwd)\s*[:=]\s*['"][^'"\s]{4,64}['"]"#,
    },
];

/// Compile the built-in catalog. Rules that fail to compile are skipped.
pub fn catalog() -> Vec<Pattern> {
    CATALOG
        .iter()
        .filter_map(|rule| match Pattern::new(rule.name, CATALOG_SOURCE, rule.expression) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("skipping catalog rule '{}': {}", rule.name, e);
                None
            }
        })
        .collect()
}
