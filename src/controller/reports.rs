//! Report upload and retrieval endpoints

use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    ingest::CsvParser,
    report::{generate, render, Report},
};

// =============================================================================
// Upload
// =============================================================================

#[post("/reports")]
pub async fn upload(
    state: web::Data<AppState<State>>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    if let Some(filename) = &query.filename {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(Error::MissingParams(String::from("No selected file")));
        }
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(Error::InputFormat(String::from(
                "Please upload a CSV file",
            )));
        }
    }

    if body.is_empty() {
        return Err(Error::MissingParams(String::from("No file part")));
    }

    let as_of = match &query.as_of {
        Some(date) => NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };

    let options = &state.config.report;
    let rows = CsvParser::new()
        .with_expected_columns(options.columns())
        .parse_bytes(&body)?;

    let report = generate(&rows, as_of, options);
    let text = render(&report);
    let id = state.reports.insert(report.clone()).await;

    info!(
        "Report {} for {} {} generated from {} rows, {} reports stored",
        id,
        report.month,
        report.date,
        rows.len(),
        state.reports.entry_count()
    );

    Ok(HttpResponse::Created().json(UploadResponse { id, report, text }))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    pub report: Report,
    pub text: String,
}

// =============================================================================
// Retrieval
// =============================================================================

#[get("/reports/{id}")]
pub async fn get_report(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let report = state.reports.get(&path.into_inner()).await?;
    Ok(web::Json((*report).clone()))
}

#[get("/reports/{id}/text")]
pub async fn get_text(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let report = state.reports.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(render(&report)))
}

#[get("/reports/{id}/download")]
pub async fn download(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let report = state.reports.get(&path.into_inner()).await?;
    let filename = format!("metrics-{}-{}.txt", report.month, report.date);

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(render(&report)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::Days;

    use super::*;
    use crate::{
        columns, configuration::Config, controller, report::ReportOptions,
    };

    fn app_state() -> AppState<State> {
        let config = Config {
            server_host: String::from("127.0.0.1"),
            port: 8080,
            allowed_origins: vec![String::from("*")],
            static_dir: String::from("static"),
            max_upload_bytes: 1024 * 1024,
            report_ttl: 60,
            report_cache_capacity: 10,
            report: ReportOptions::default(),
        };
        AppState::new(State::new(config))
    }

    fn csv() -> String {
        format!(
            "origin_timestamp,from_asset_amount_usd,from_chain_name,to_chain_name,from_asset_symbol,{},{}\n\
             2025-03-09 10:00:00,1500000,arbitrum,base,USDC,,ali\n\
             2025-03-09 11:00:00,500000,base,ethereum,ETH,{},\n\
             2025-03-08 11:00:00,1000000,base,ethereum,ETH,,\n",
            columns::MARKET_MAKER_INITIATOR,
            columns::REBALANCER_INITIATOR,
            columns::MARKET_MAKER_BOT,
        )
    }

    macro_rules! service {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(app_state()))
                    .service(web::scope("/api").configure(controller::routes)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_upload_then_fetch_text() {
        let app = service!();

        let req = test::TestRequest::post()
            .uri("/api/reports?filename=daily.csv&as_of=2025-03-10")
            .set_payload(csv())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: UploadResponse = test::read_body_json(resp).await;
        assert_eq!(body.report.total_volume, "$2.00M");
        assert_eq!(body.report.dod_change, "100%");
        assert_eq!(body.report.user_tx_count, 1);
        assert_eq!(body.report.mm_bot_count, 1);
        assert_eq!(body.report.top_users[0].name, "ali");

        let req = test::TestRequest::get()
            .uri(&format!("/api/reports/{}/text", body.id))
            .to_request();
        let text = test::call_and_read_body(&app, req).await;
        assert_eq!(text, body.text.as_bytes());
        assert!(body.text.starts_with("**Metrics Mar 09**\n"));

        let req = test::TestRequest::get()
            .uri(&format!("/api/reports/{}", body.id))
            .to_request();
        let report: Report = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report, body.report);
    }

    #[actix_web::test]
    async fn test_download_is_an_attachment() {
        let app = service!();

        let req = test::TestRequest::post()
            .uri("/api/reports?as_of=2025-03-10")
            .set_payload(csv())
            .to_request();
        let body: UploadResponse =
            test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/reports/{}/download", body.id))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert_eq!(disposition, "attachment; filename=\"metrics-Mar-09.txt\"");
    }

    #[actix_web::test]
    async fn test_default_as_of_is_today() {
        let app = service!();
        let yesterday = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(1))
            .unwrap();
        let payload = format!(
            "origin_timestamp,from_asset_amount_usd\n{} 09:00:00,250000\n",
            yesterday.format("%Y-%m-%d")
        );

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_payload(payload)
            .to_request();
        let body: UploadResponse =
            test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.report.total_volume, "$0.25M");
    }

    #[actix_web::test]
    async fn test_upload_rejections() {
        let app = service!();

        let cases = [
            ("/api/reports?filename=daily.csv", String::new()),
            ("/api/reports?filename=daily.xlsx", csv()),
            ("/api/reports?filename=", csv()),
            ("/api/reports?as_of=10/03/2025", csv()),
            ("/api/reports", String::from("\n\n")),
        ];

        for (uri, payload) in cases {
            let req = test::TestRequest::post()
                .uri(uri)
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_header_only_upload_gives_zero_report() {
        let app = service!();

        let req = test::TestRequest::post()
            .uri("/api/reports?as_of=2025-03-10")
            .set_payload("origin_timestamp,from_asset_amount_usd\n")
            .to_request();
        let body: UploadResponse =
            test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.report.total_volume, "$0.00M");
        assert_eq!(body.report.avg_tx_size, "$0.0k");
        assert!(body.report.top_pathways.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_report_is_not_found() {
        let app = service!();

        for uri in [
            "/api/reports/unknown",
            "/api/reports/unknown/text",
            "/api/reports/unknown/download",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }
}
