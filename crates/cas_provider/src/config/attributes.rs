use std::collections::BTreeMap;

use quick_xml::escape::escape;

use crate::{models::User, Result};

/// Custom attributes released for a user, by attribute name
pub type Attributes = BTreeMap<String, Vec<String>>;

/// Source of custom attributes for a user
#[async_trait]
pub trait AttributeSource: Send + Sync {
    async fn attributes(&self, user: &User) -> Result<Attributes>;
}

/// Serialises custom attributes into the body of `<cas:authenticationSuccess>`
pub trait AttributeFormatter: Send + Sync {
    fn format(&self, attributes: &Attributes) -> String;
}

/// Built-in attribute dialects
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AttributeFormat {
    /// `<cas:attributes><cas:name>value</cas:name></cas:attributes>`
    #[default]
    Jasig,

    /// `<cas:name>value</cas:name>` directly in the success element
    RubyCas,

    /// `<cas:attribute name="name" value="value"/>`
    NameValue,
}

impl AttributeFormatter for AttributeFormat {
    fn format(&self, attributes: &Attributes) -> String {
        let mut out = String::new();
        if attributes.is_empty() {
            return out;
        }

        match self {
            AttributeFormat::Jasig => {
                out.push_str("<cas:attributes>");
                push_elements(&mut out, attributes);
                out.push_str("</cas:attributes>");
            }
            AttributeFormat::RubyCas => push_elements(&mut out, attributes),
            AttributeFormat::NameValue => {
                for (name, values) in attributes {
                    for value in values {
                        out.push_str(&format!(
                            "<cas:attribute name=\"{}\" value=\"{}\"/>",
                            escape(name.as_str()),
                            escape(value.as_str())
                        ));
                    }
                }
            }
        }

        out
    }
}

fn push_elements(out: &mut String, attributes: &Attributes) {
    for (name, values) in attributes {
        if !is_element_name(name) {
            debug!("Skipping attribute {name:?}, not usable as an element name");
            continue;
        }

        for value in values {
            out.push_str(&format!(
                "<cas:{name}>{}</cas:{name}>",
                escape(value.as_str())
            ));
        }
    }
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
