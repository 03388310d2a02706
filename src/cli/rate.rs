use super::ui;
use crate::core::{Converter, RateProvider};
use anyhow::{Result, bail};

async fn load<P: RateProvider + 'static>(converter: &Converter<P>) {
    let pb = ui::new_spinner("Fetching NBP rate...");
    converter.mount().await;
    pb.finish_and_clear();
}

/// Prints the rate card, or the whole view as JSON.
pub async fn run<P: RateProvider + 'static>(converter: &Converter<P>, json: bool) -> Result<()> {
    load(converter).await;
    let view = converter.view().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", ui::render_rate_card(&view));
    }

    match view.error {
        Some(error) if view.rate.is_none() => bail!("Failed to fetch rate: {error}"),
        _ => Ok(()),
    }
}

/// Converts a single amount and prints the result.
pub async fn run_convert<P: RateProvider + 'static>(
    converter: &mut Converter<P>,
    amount: &str,
) -> Result<()> {
    load(converter).await;
    converter.set_amount(amount);
    let view = converter.view().await;

    if let Some(error) = &view.error {
        bail!("Failed to fetch rate: {error}");
    }

    let Some(result) = view.preview else {
        bail!("Invalid amount: {amount:?}");
    };

    println!(
        "{} {} = {} {}",
        amount.trim(),
        view.base_code,
        ui::style_text(&format!("{result:.2}"), ui::StyleType::Rate),
        view.quote_code
    );
    if let (Some(rate), Some(date)) = (view.rate, view.effective_date) {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "1 {} = {rate:.4} {} (NBP mid rate of {date})",
                    view.base_code, view.quote_code
                ),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}
