use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use common::db::{self, establish_connection, init_schema, LeadInsert};
use common::models::LeadSubmission;
use common::responses::{
    SubmitLeadResponse, ERR_DUPLICATE_LEAD, ERR_METHOD_NOT_ALLOWED, ERR_MISSING_FIELDS, ERR_SERVER,
};
use dotenv::dotenv;
use sqlx::{Pool, Sqlite};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

struct AppState {
    pool: Pool<Sqlite>,
}

/// `POST /api/lead`: validate presence, reject duplicates, insert.
///
/// The four rejection bodies and the success body are a stable contract
/// with the form client; internal failure detail is logged here and
/// never sent over the wire.
async fn submit_lead(
    submission: web::Json<LeadSubmission>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let submission = submission.into_inner();
    info!("Lead submission arrived for {}", submission.email);

    if !submission.has_required_fields() {
        return HttpResponse::BadRequest().json(SubmitLeadResponse::rejected(ERR_MISSING_FIELDS));
    }

    match db::create_lead(&app_state.pool, &submission).await {
        Ok(LeadInsert::Created(lead)) => {
            info!("Created lead {} for {}", lead.id, lead.email);
            HttpResponse::Ok().json(SubmitLeadResponse::created(lead))
        }
        Ok(LeadInsert::Duplicate) => {
            info!("Rejected duplicate lead for {}", submission.email);
            HttpResponse::Conflict().json(SubmitLeadResponse::rejected(ERR_DUPLICATE_LEAD))
        }
        Err(e) => {
            error!("Lead creation failed: {e:#}");
            HttpResponse::InternalServerError().json(SubmitLeadResponse::rejected(ERR_SERVER))
        }
    }
}

/// Anything other than POST on the lead resource.
async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(SubmitLeadResponse::rejected(ERR_METHOD_NOT_ALLOWED))
}

#[actix_web::get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

fn lead_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(
        web::resource("/api/lead")
            .route(web::post().to(submit_lead))
            .route(web::route().to(method_not_allowed)),
    );
}

fn cors_for(allowed_origins: &[String]) -> Cors {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return Cors::permissive();
    }
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header();
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Starting the lead intake service");
    let pool = establish_connection(&config.database_url).await?;
    init_schema(&pool).await?;
    let app_state = web::Data::new(AppState { pool });

    let address = config.server_address();
    info!("Starting HTTP server on {address}");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(cors_for(&config.allowed_origins))
            .configure(lead_routes)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_state() -> web::Data<AppState> {
        // Single connection so every handler sees the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        init_schema(&pool).await.expect("Failed to init schema");
        web::Data::new(AppState { pool })
    }

    async fn lead_count(state: &web::Data<AppState>) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
            .fetch_one(&state.pool)
            .await
            .expect("Failed to count leads");
        count
    }

    fn asha() -> serde_json::Value {
        json!({
            "firstName": "Asha",
            "lastName": "Rao",
            "phone": "+919876543210",
            "email": "asha@example.com",
            "age": "26 - 35",
            "city": "Bangalore"
        })
    }

    #[actix_web::test]
    async fn missing_required_field_is_a_bad_request() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let mut payload = asha();
        payload.as_object_mut().unwrap().remove("email");
        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: SubmitLeadResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some(ERR_MISSING_FIELDS));
        assert_eq!(lead_count(&state).await, 0);
    }

    #[actix_web::test]
    async fn blank_required_field_is_a_bad_request() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let mut payload = asha();
        payload["city"] = json!("   ");
        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(lead_count(&state).await, 0);
    }

    #[actix_web::test]
    async fn valid_submission_creates_one_lead_and_echoes_it() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(asha())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: SubmitLeadResponse = test::read_body_json(resp).await;
        assert!(body.success);
        let lead = body.lead.expect("success body must carry the lead");
        assert_eq!(lead.email, "asha@example.com");
        assert_eq!(lead.city, "Bangalore");
        assert_eq!(lead.company, None);
        assert_eq!(lead_count(&state).await, 1);
    }

    #[actix_web::test]
    async fn duplicate_email_or_phone_is_a_conflict() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(asha())
            .to_request();
        test::call_service(&app, req).await;

        // Same phone, fresh email.
        let mut payload = asha();
        payload["email"] = json!("second@example.com");
        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: SubmitLeadResponse = test::read_body_json(resp).await;
        assert_eq!(body.error.as_deref(), Some(ERR_DUPLICATE_LEAD));
        assert_eq!(lead_count(&state).await, 1);
    }

    #[actix_web::test]
    async fn resubmitting_the_identical_payload_always_conflicts() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(asha())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/lead")
                .set_json(asha())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CONFLICT);
        }
        assert_eq!(lead_count(&state).await, 1);
    }

    #[actix_web::test]
    async fn wrong_verb_is_method_not_allowed() {
        let state = test_state().await;
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(lead_routes)).await;

        let req = test::TestRequest::get().uri("/api/lead").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: SubmitLeadResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some(ERR_METHOD_NOT_ALLOWED));
    }

    #[tokio::test]
    async fn form_controller_end_to_end() {
        use lead_form::controller::{LeadForm, SubmitOutcome};

        let state = test_state().await;
        let server_state = state.clone();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let port = listener.local_addr().expect("no local addr").port();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .configure(lead_routes)
        })
        .listen(listener)
        .expect("Failed to listen")
        .workers(1)
        .run();
        tokio::spawn(server);

        let api_url = format!("http://127.0.0.1:{port}/api/lead");
        let client = reqwest::Client::new();

        let mut form = LeadForm::new();
        form.draft.first_name = "Asha".to_string();
        form.draft.last_name = "Rao".to_string();
        form.draft.phone = "+919876543210".to_string();
        form.draft.email = "asha@example.com".to_string();
        form.draft.age = "26 - 35".to_string();
        form.select_city("Bangalore");

        let outcome = form.submit(&client, &api_url).await;
        match outcome {
            SubmitOutcome::Redirect(path) => assert_eq!(path, "/thank-you"),
            other => panic!("expected a redirect, got {other:?}"),
        }
        assert_eq!(lead_count(&state).await, 1);

        // Resubmitting the identical payload conflicts; the form keeps
        // its data and shows the inline message.
        let outcome = form.submit(&client, &api_url).await;
        assert!(matches!(outcome, SubmitOutcome::Error));
        assert_eq!(form.submit_error(), Some("Something went wrong."));
        assert_eq!(form.draft.first_name, "Asha");
        assert_eq!(lead_count(&state).await, 1);

        // The "Other" sentinel transmits the free-text city.
        let mut form = LeadForm::new();
        form.draft.first_name = "Ravi".to_string();
        form.draft.last_name = "Mehta".to_string();
        form.draft.phone = "+911234567890".to_string();
        form.draft.email = "ravi@example.com".to_string();
        form.draft.age = "18 - 25".to_string();
        form.select_city("Other");
        form.set_custom_city("Jaipur");

        let outcome = form.submit(&client, &api_url).await;
        assert!(matches!(outcome, SubmitOutcome::Redirect(_)));
        let (city,): (String,) = sqlx::query_as("SELECT city FROM leads WHERE email = ?")
            .bind("ravi@example.com")
            .fetch_one(&state.pool)
            .await
            .expect("Failed to fetch the created lead");
        assert_eq!(city, "Jaipur");
    }

    #[actix_web::test]
    async fn health_check_reports_ok() {
        let state = test_state().await;
        let app = test::init_service(App::new().app_data(state).configure(lead_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
