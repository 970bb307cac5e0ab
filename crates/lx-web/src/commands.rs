use anyhow::Context;
use lx_config::LxConfig;
use lx_core::entities::Country;
use lx_core::responses::PredictionReport;
use lx_db::seed::seed_demo;
use lx_db::service::LxService;
use lx_web::AppState;
use lx_web::routes::predict::prediction_for;

use crate::cli::{PredictArgs, ServeArgs};

pub async fn serve(args: &ServeArgs, mut config: LxConfig, service: LxService) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let address = config.server.bind_address();
    let state = AppState::new(service, config)?;
    lx_web::serve(state, &address).await
}

pub async fn predict(args: &PredictArgs, config: &LxConfig, service: &LxService) -> anyhow::Result<()> {
    let country = resolve_country(service, &args.country).await?;
    let target_year = args
        .target_year
        .unwrap_or(config.predictor.default_target_year);

    match prediction_for(service, &country, target_year).await? {
        Ok(report) => println!("{}", format_report(&report)),
        Err(reason) => println!("{}: {reason}", country.name),
    }
    Ok(())
}

pub async fn seed(service: &LxService) -> anyhow::Result<()> {
    let summary = seed_demo(service).await?;
    if summary.is_empty() {
        println!("demo dataset already present");
    } else {
        println!(
            "seeded {} regions, {} sub-regions, {} intermediate regions, {} countries, {} observations",
            summary.regions,
            summary.sub_regions,
            summary.intermediate_regions,
            summary.countries,
            summary.observations
        );
    }
    Ok(())
}

/// Look a country up by numeric id, falling back to a case-insensitive name match.
async fn resolve_country(service: &LxService, query: &str) -> anyhow::Result<Country> {
    if let Ok(id) = query.parse::<i64>() {
        return service
            .get_country(id)
            .await
            .with_context(|| format!("no country with id {id}"));
    }
    service
        .find_country_by_name(query)
        .await?
        .with_context(|| format!("no country named '{query}'"))
}

fn format_report(report: &PredictionReport) -> String {
    format!(
        "{country} in {year}: {predicted}\n  slope {slope} per year ({trend})\n  fitted on {n} observations, {first}-{last}",
        country = report.country_name,
        year = report.fit.target_year,
        predicted = report.fit.display_predicted(),
        slope = report.fit.display_slope(),
        trend = report.fit.trend,
        n = report.sample_size,
        first = report.first_year,
        last = report.last_year,
    )
}

#[cfg(test)]
mod tests {
    use lx_core::trend::{SeriesPoint, predict};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn report_formats_rounded_values() {
        let series = [SeriesPoint::new(2018, 70.0), SeriesPoint::new(2019, 71.0), SeriesPoint::new(2020, 72.0)];
        let fit = predict(&series, 2026).unwrap();
        let report = PredictionReport::new("Chile", &series, fit);

        assert_eq!(
            format_report(&report),
            "Chile in 2026: 78.00\n  slope 1.0000 per year (Improving)\n  fitted on 3 observations, 2018-2020"
        );
    }

    #[tokio::test]
    async fn resolves_by_id_or_name() {
        let service = LxService::new_local(":memory:").await.unwrap();
        seed_demo(&service).await.unwrap();

        let by_name = resolve_country(&service, "peru").await.unwrap();
        let by_id = resolve_country(&service, &by_name.id.to_string()).await.unwrap();
        assert_eq!(by_name, by_id);
        assert!(resolve_country(&service, "Atlantis").await.is_err());
        assert!(resolve_country(&service, "9999").await.is_err());
    }
}
