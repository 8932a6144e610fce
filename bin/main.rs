use anyhow::Context;

use seedling::{
    config::Config,
    logging,
    sensor::{AdcSample, SensorReader},
    smtp::{SmtpSession, TlsTransport},
};

/// Send one plant status update.
///
/// Usage: `seedling <light> <temperature> <moisture> <battery>`, passing the
/// four raw 10-bit ADC codes as sampled. Configuration is read from
/// `./seedling.config.toml`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let codes = std::env::args()
        .skip(1)
        .map(|arg| {
            arg.parse::<u16>()
                .with_context(|| format!("'{arg}' is not a raw ADC code"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [light, temperature, moisture, battery] = codes[..] else {
        anyhow::bail!("usage: seedling <light> <temperature> <moisture> <battery>");
    };

    let config = Config::from_config("./seedling.config.toml")
        .context("loading ./seedling.config.toml")?;

    let reader = SensorReader::new(config.calibration);
    let reading = reader.read(AdcSample {
        light,
        temperature,
        moisture,
        battery,
    });

    let mut session = SmtpSession::new(config.smtp, TlsTransport::new());
    let report = session
        .send_update_email("Plant Status Update", &reading.to_html())
        .await;

    println!("{}", report.status);

    if report.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
