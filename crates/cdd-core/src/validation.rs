//! Validation and parsing of the creation wizard's free-text fields
//!
//! Both fields are comma-separated lists. Empty entries are skipped, so
//! `"8080:80,"` is the same as `"8080:80"`, and a blank field is valid.

use crate::CreationRequest;
use cdd_provider::{CreateOptions, PortBinding};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port mapping '{0}': expected host:container")]
    InvalidPort(String),

    #[error("Port out of range in '{0}': must be 0-65535")]
    PortOutOfRange(String),

    #[error("Invalid environment variable '{0}': expected NAME=value")]
    InvalidEnvVar(String),

    #[error("Image name cannot be empty")]
    EmptyImage,
}

fn entries(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|e| !e.is_empty())
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Split `host:container`, both sides numeric
fn split_port(entry: &str) -> Option<(&str, &str)> {
    let (host, container) = entry.split_once(':')?;
    let (host, container) = (host.trim(), container.trim());
    (is_number(host) && is_number(container)).then_some((host, container))
}

fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Whether every entry is `host:container` with both sides numeric
pub fn validate_ports(input: &str) -> bool {
    entries(input).all(|e| split_port(e).is_some())
}

/// Parse port mappings into bindings
pub fn parse_ports(input: &str) -> Result<Vec<PortBinding>, ValidationError> {
    entries(input)
        .map(|entry| {
            let (host, container) =
                split_port(entry).ok_or_else(|| ValidationError::InvalidPort(entry.to_string()))?;
            let out_of_range = || ValidationError::PortOutOfRange(entry.to_string());
            Ok(PortBinding {
                host_port: host.parse().map_err(|_| out_of_range())?,
                container_port: container.parse().map_err(|_| out_of_range())?,
            })
        })
        .collect()
}

/// Whether every entry is `NAME=value` with a valid variable name
pub fn validate_env_vars(input: &str) -> bool {
    entries(input).all(|e| matches!(e.split_once('='), Some((name, _)) if is_env_name(name.trim())))
}

/// Parse environment assignments into `NAME=value` strings
pub fn parse_env_vars(input: &str) -> Result<Vec<String>, ValidationError> {
    entries(input)
        .map(|entry| match entry.split_once('=') {
            Some((name, value)) if is_env_name(name.trim()) => {
                Ok(format!("{}={}", name.trim(), value))
            }
            _ => Err(ValidationError::InvalidEnvVar(entry.to_string())),
        })
        .collect()
}

/// Translate the wizard's raw fields into an image reference and runtime options
pub fn create_options(request: &CreationRequest) -> Result<(String, CreateOptions), ValidationError> {
    let image = request.image_name.trim();
    if image.is_empty() {
        return Err(ValidationError::EmptyImage);
    }

    let name = request.container_name.trim();
    let options = CreateOptions {
        name: (!name.is_empty()).then(|| name.to_string()),
        env: parse_env_vars(&request.env_input)?,
        ports: parse_ports(&request.port_input)?,
        tty: true,
    };
    Ok((image.to_string(), options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_valid() {
        assert!(validate_ports("8080:80"));
        assert!(validate_ports("8080:80,443:443"));
        assert!(validate_ports(" 8080 : 80 , 3000:3000 "));
        assert!(validate_ports("8080:80,"));
        assert!(validate_ports(""));
        assert!(validate_ports("   "));
    }

    #[test]
    fn test_ports_invalid() {
        assert!(!validate_ports("8080"));
        assert!(!validate_ports("8080:"));
        assert!(!validate_ports(":80"));
        assert!(!validate_ports("http:80"));
        assert!(!validate_ports("8080:80,abc"));
        assert!(!validate_ports("1:2:3"));
        assert!(!validate_ports("-1:80"));
    }

    #[test]
    fn test_parse_ports() {
        assert_eq!(
            parse_ports("8080:80, 443:8443").unwrap(),
            vec![
                PortBinding { host_port: 8080, container_port: 80 },
                PortBinding { host_port: 443, container_port: 8443 },
            ]
        );
        assert!(parse_ports("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_ports_out_of_range() {
        assert!(validate_ports("70000:80"));
        assert_eq!(
            parse_ports("70000:80"),
            Err(ValidationError::PortOutOfRange("70000:80".to_string()))
        );
        assert_eq!(
            parse_ports("80"),
            Err(ValidationError::InvalidPort("80".to_string()))
        );
    }

    #[test]
    fn test_env_vars() {
        assert!(validate_env_vars("FOO=bar,BAZ=qux"));
        assert!(validate_env_vars("_private=1"));
        assert!(validate_env_vars("EMPTY="));
        assert!(validate_env_vars("URL=postgres://u:p@h/db?x=y"));
        assert!(validate_env_vars(""));
        assert!(!validate_env_vars("NOEQUALS"));
        assert!(!validate_env_vars("123BAD=x"));
        assert!(!validate_env_vars("BAD-NAME=x"));
        assert!(!validate_env_vars("=value"));
        assert!(!validate_env_vars("FOO=bar,oops"));
    }

    #[test]
    fn test_parse_env_vars_keeps_value_verbatim() {
        assert_eq!(
            parse_env_vars(" FOO =bar, URL=a=b").unwrap(),
            vec!["FOO=bar".to_string(), "URL=a=b".to_string()]
        );
    }

    #[test]
    fn test_create_options() {
        let request = CreationRequest {
            image_name: " redis ".to_string(),
            container_name: "".to_string(),
            port_input: "6379:6379".to_string(),
            env_input: "FOO=bar".to_string(),
        };
        let (image, options) = create_options(&request).unwrap();
        assert_eq!(image, "redis");
        assert_eq!(options.name, None);
        assert_eq!(options.env, vec!["FOO=bar".to_string()]);
        assert_eq!(options.ports.len(), 1);
        assert!(options.tty);
    }
}
