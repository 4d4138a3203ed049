//! Subcommand implementations: thin drivers over the `ral` core.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use ral::{AttributeMap, Provider, Resource, ScriptProvider};
use std::path::Path;

/// Load a provider from its script path and refuse to proceed when it
/// declares itself unsuitable for this host.
fn load(script: &Path) -> Result<ScriptProvider> {
    let provider = ScriptProvider::from_sidecar(script)
        .with_context(|| format!("failed to load provider {}", script.display()))?;
    if !provider.suitable()? {
        bail!("provider {} is not suitable on this host", script.display());
    }
    Ok(provider)
}

pub fn describe(script: &Path) -> Result<()> {
    let provider = load(script)?;
    provider.prepare()?;
    let Some(spec) = provider.spec() else {
        bail!("provider {} has no spec after prepare", script.display());
    };

    println!("{} ({})", spec.type_name().bold(), script.display());
    for attr in spec.attrs() {
        let marker = if attr.namevar { "*" } else { " " };
        println!(
            "  {marker}{:<16} {:<12} {:<3} {}",
            attr.name.bold(),
            attr.attr_type.to_string(),
            attr.access.to_string(),
            attr.desc.dimmed()
        );
    }
    Ok(())
}

pub fn list(script: &Path) -> Result<()> {
    let provider = load(script)?;
    let resources = provider.instances();
    if resources.is_empty() {
        println!("{}", "no resources found".dimmed());
        return Ok(());
    }
    for resource in &resources {
        print_resource(resource);
    }
    Ok(())
}

pub fn find(script: &Path, name: &str) -> Result<()> {
    let provider = load(script)?;
    match provider.find(name) {
        Some(resource) => {
            print_resource(&resource);
            Ok(())
        }
        None => bail!("resource '{name}' not found"),
    }
}

pub fn set(script: &Path, name: &str, attrs: &[String]) -> Result<()> {
    let provider = load(script)?;
    provider.prepare()?;

    let mut should = AttributeMap::new();
    for pair in attrs {
        let Some((attr, raw)) = pair.split_once('=') else {
            bail!("invalid assignment '{pair}' (expected attr=value)");
        };
        let value = provider
            .parse(attr, raw)
            .with_context(|| format!("invalid value for '{attr}'"))?;
        should.set(attr, value);
    }

    let mut resource = provider
        .find(name)
        .unwrap_or_else(|| provider.create(name));
    let changes = provider.update(&mut resource, &should)?;

    if changes.is_empty() {
        println!("{}", "no changes".dimmed());
    } else {
        for change in &changes {
            println!(
                "{} {}({} {} {})",
                "~".yellow(),
                change.attr.bold(),
                change.was,
                "->".dimmed(),
                change.is.to_string().green()
            );
        }
    }
    Ok(())
}

fn print_resource(resource: &Resource) {
    println!("{}", resource.name().bold());
    for (attr, value) in resource.attrs() {
        println!("  {attr} = {value}");
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    const DESCRIPTOR: &str = r#"{
      "provider": {
        "type": "widget",
        "suitable": "true",
        "attributes": {
          "name": { "type": "string" },
          "color": { "type": "string" }
        }
      }
    }"#;

    /// Write a provider script answering `find` with a fixed resource,
    /// along with its sidecar descriptor.
    fn write_provider(dir: &Path, descriptor: &str) -> PathBuf {
        let path = dir.join("widget.sh");
        fs::write(
            &path,
            "#!/bin/sh\ncat >/dev/null\necho '{\"resource\":{\"name\":\"foo\",\"color\":\"red\"}}'\n",
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.join("widget.sh.json"), descriptor).unwrap();
        path
    }

    #[test]
    fn test_find_missing_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_provider(dir.path(), DESCRIPTOR);

        assert!(find(&script, "foo").is_ok());

        // The fixed response is named "foo", so "bar" does not exist;
        // that must surface as an error return, not a process exit
        let err = find(&script, "bar").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unsuitable_provider_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = DESCRIPTOR.replace("\"true\"", "\"false\"");
        let script = write_provider(dir.path(), &descriptor);

        let err = find(&script, "foo").unwrap_err();
        assert!(err.to_string().contains("not suitable"));
    }
}
