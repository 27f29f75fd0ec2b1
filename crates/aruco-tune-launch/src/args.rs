//! Declared launch arguments and `name:=value` overrides.

use crate::LaunchError;

/// An argument the launch description declares, with its default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchArgument {
    pub name: String,
    pub default: String,
    pub description: String,
}

impl LaunchArgument {
    pub fn new(name: &str, default: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: default.to_string(),
            description: description.to_string(),
        }
    }
}

/// Split a `name:=value` token. The value may be empty; the name may not.
pub fn parse_override(token: &str) -> Result<(String, String), LaunchError> {
    match token.split_once(":=") {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(LaunchError::MalformedOverride(token.to_string())),
    }
}

/// Final argument values, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedArguments {
    values: Vec<(String, String)>,
}

impl ResolvedArguments {
    /// Apply `overrides` on top of the declared defaults.
    ///
    /// Later overrides of the same name win. Overriding an undeclared name
    /// is an error.
    pub fn resolve<'a, I>(declared: &[LaunchArgument], overrides: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values: Vec<(String, String)> = declared
            .iter()
            .map(|a| (a.name.clone(), a.default.clone()))
            .collect();

        for token in overrides {
            let (name, value) = parse_override(token)?;
            match values.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value,
                None => {
                    let declared = declared
                        .iter()
                        .map(|a| a.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(LaunchError::UnknownArgument { name, declared });
                }
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
