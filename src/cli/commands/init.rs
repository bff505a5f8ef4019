use crate::config::Config;
use crate::db::Store;

pub async fn cmd_init(config: &Config) -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!(
            "✓ Wrote default config to {}",
            Config::default_config_path().display()
        );
    } else {
        println!(
            "Config already exists at {}",
            Config::default_config_path().display()
        );
    }

    Store::new(&config.general.database_url).await?;
    println!("✓ Database ready at {}", config.general.database_url);

    if !config.server.secure_cookies {
        println!(
            "Note: session cookies are sent without the Secure flag. \
             Set server.secure_cookies = true when serving over HTTPS."
        );
    }

    Ok(())
}
