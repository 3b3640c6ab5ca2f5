use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::AppointmentCellState;
use doctor_cell::router::{availability_routes, doctor_routes};
use doctor_cell::DoctorCellState;
use shared_config::AppConfig;
use video_conferencing_cell::VideoRoomProvider;

pub fn create_router(config: Arc<AppConfig>, video: Arc<dyn VideoRoomProvider>) -> Router {
    let doctors = DoctorCellState::from_config(config);
    let appointments = AppointmentCellState::from_config(&doctors, video);

    Router::new()
        .route("/", get(|| async { "Telehealth Scheduling API is running!" }))
        .nest("/doctors", doctor_routes(doctors.clone()))
        .nest("/availability", availability_routes(doctors))
        .nest("/appointments", appointment_routes(appointments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use shared_utils::test_utils::TestConfig;
    use video_conferencing_cell::build_provider;

    fn app() -> Router {
        let config = TestConfig::default().to_arc();
        let video = build_provider(&config).unwrap();
        create_router(config, video)
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Telehealth Scheduling API is running!");
    }

    #[tokio::test]
    async fn test_cells_are_mounted() {
        let public_day = app()
            .oneshot(
                Request::builder()
                    .uri("/availability/4b7e0b0e-5c1d-4a51-9f66-6a1f4c0d9a10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(public_day.status(), StatusCode::OK);

        let protected = app()
            .oneshot(Request::builder().uri("/appointments/mine").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
    }
}
