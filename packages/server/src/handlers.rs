//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use community_safety_dashboard::{TOP_SAFEST_COUNT, build_view, heatmap_data, top_safest_areas};
use community_safety_dashboard_models::SelectionRequest;
use community_safety_server_models::{
    ApiAreaDetail, ApiError, ApiHealth, ApiOptions, DashboardQueryParams, HeatmapQueryParams,
    TopSafestQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        area_count: state.dataset.areas().len(),
    })
}

/// `GET /api/options`
///
/// Returns the choices and initial values for every filter control.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    let areas = state
        .dataset
        .area_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    HttpResponse::Ok().json(ApiOptions::new(areas))
}

/// `GET /api/dashboard`
///
/// Builds every visual for the selection in the query string. Always
/// returns 200; an invalid selection yields a blank view with a warning.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let request = SelectionRequest::from(&*params);
    HttpResponse::Ok().json(build_view(&state.dataset, &request))
}

/// `POST /api/dashboard`
///
/// Same as the `GET` variant with the selection as a JSON body.
pub async fn dashboard_post(
    state: web::Data<AppState>,
    request: web::Json<SelectionRequest>,
) -> HttpResponse {
    HttpResponse::Ok().json(build_view(&state.dataset, &request))
}

/// `GET /api/heatmap`
///
/// Choropleth data alone, for redrawing the map without the side panels.
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let year = params.year.as_deref().and_then(|y| y.trim().parse().ok());
    HttpResponse::Ok().json(heatmap_data(
        &state.dataset,
        params.crime_type.as_deref(),
        year,
    ))
}

/// `GET /api/top-safest`
///
/// Areas with the highest final safety score.
pub async fn top_safest(
    state: web::Data<AppState>,
    params: web::Query<TopSafestQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(TOP_SAFEST_COUNT);
    HttpResponse::Ok().json(top_safest_areas(&state.dataset, limit))
}

/// `GET /api/areas/{name}`
///
/// Every stored value of one area, or 404.
pub async fn area_detail(state: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    let Some(record) = state.dataset.area(&name) else {
        log::debug!("Area lookup miss: {name}");
        return HttpResponse::NotFound().json(ApiError {
            error: format!("Unknown area '{name}'"),
        });
    };

    let bounds = state
        .dataset
        .boundary(&record.join_key)
        .and_then(|b| b.bounds);
    HttpResponse::Ok().json(ApiAreaDetail::new(
        record.name.clone(),
        record.join_key.clone(),
        record.has_data,
        record.values().collect(),
        bounds,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use community_safety_dataset::{Dataset, DatasetConfig};
    use serde_json::Value;

    use crate::{AppState, configure};

    const CSV: &str = include_str!("../../dataset/fixtures/crime_areas.csv");
    const GEOJSON: &str = include_str!("../../dataset/fixtures/boundaries.geojson");

    fn state() -> web::Data<AppState> {
        let dataset =
            Dataset::from_readers(CSV.as_bytes(), GEOJSON, &DatasetConfig::default()).unwrap();
        web::Data::new(AppState {
            dataset: Arc::new(dataset),
        })
    }

    async fn get_json(uri: &str) -> Value {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_and_read_body_json(&app, req).await
    }

    #[actix_web::test]
    async fn health_reports_area_count() {
        let body = get_json("/api/health").await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["areaCount"], 4);
    }

    #[actix_web::test]
    async fn options_list_crime_rows_and_defaults() {
        let body = get_json("/api/options").await;
        assert_eq!(body["areas"], serde_json::json!(["Albury", "Ballina", "Sydney"]));
        assert_eq!(body["defaults"]["areas"], serde_json::json!(["Albury", "Ballina"]));
        assert_eq!(body["defaults"]["year"], "2023");
        assert_eq!(body["defaults"]["crimeType"], "Theft");
        assert_eq!(body["years"][0], "2020");
    }

    #[actix_web::test]
    async fn dashboard_builds_view_from_query() {
        let body = get_json(
            "/api/dashboard?areas=Albury,Ballina&year=2023&crimeType=Theft&compare=Theft,Drug",
        )
        .await;
        assert_eq!(body["warning"], "");
        assert_eq!(body["gauges"][0]["tier"], "good");
        assert_eq!(body["gauges"][1]["tier"], "warn");
        assert_eq!(body["heatmap"]["column"], "Theft_Count_2023");
        assert_eq!(body["primaryBreakdown"]["slices"][0]["value"], 10.0);
        assert_eq!(body["comparison"]["groups"][1]["category"], "Drug");
    }

    #[actix_web::test]
    async fn dashboard_warns_on_three_areas() {
        let body = get_json("/api/dashboard?areas=Albury,Ballina,Sydney&year=2023").await;
        assert_eq!(body["warning"], "Only a maximum of 2 suburbs can be selected.");
        assert!(body["heatmap"].is_null());
        assert_eq!(body["gauges"], serde_json::json!([]));
        assert!(body["trend"].is_null());
        assert!(body["comparison"].is_null());
    }

    #[actix_web::test]
    async fn dashboard_accepts_json_body() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(serde_json::json!({
                "areas": ["Albury"],
                "year": "2022",
                "crimeType": "Assault",
                "compare": ["Damage"]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["trend"]["title"], "Assault Rate Trend");
        assert_eq!(body["comparison"]["groups"][0]["bars"][0]["area"], "Albury");
        assert!(body["secondaryBreakdown"].is_null());
    }

    #[actix_web::test]
    async fn heatmap_falls_back_to_theft() {
        let body = get_json("/api/heatmap?crimeType=Fraud&year=2021").await;
        assert_eq!(body["column"], "Theft_Count_2021");
        assert_eq!(body["label"], "Number of Theft");
    }

    #[actix_web::test]
    async fn top_safest_defaults_to_three() {
        let body = get_json("/api/top-safest").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["name"], "Albury");
    }

    #[actix_web::test]
    async fn area_detail_and_not_found() {
        let body = get_json("/api/areas/Ballina").await;
        assert_eq!(body["finalSafetyScore"], 55.0);
        assert_eq!(body["values"]["Theft_Count_2023"], 20.0);
        assert_eq!(body["hasData"], true);

        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/areas/Atlantis").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
