use miette::{IntoDiagnostic, Result};
use pkgmap_core::version::{version_info, version_string};

pub fn run(json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(&serde_json::json!({
            "ok": true,
            "version": version_info(),
        }))
        .into_diagnostic()?;
        println!("{out}");
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
