use keystore_signing::{BuildContext, BuildType, SigningConfig, SigningConfigLoader};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), keystore_signing::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let project_root = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let loader = SigningConfigLoader::new(&project_root).with_env("SIGNING", "__");
    let ctx = BuildContext::from_loader(&loader)?;

    match ctx.signing_for(BuildType::Release) {
        SigningConfig::Release(creds) => {
            // Summary never carries passwords
            let summary = toml::to_string_pretty(&creds.summary())
                .unwrap_or_else(|e| format!("<unrenderable summary: {e}>"));
            println!("release signing:\n{summary}");
        }
        SigningConfig::Fallback => {
            println!(
                "no {} found, release builds use fallback signing",
                loader.properties_path().display()
            );
        }
    }

    Ok(())
}
