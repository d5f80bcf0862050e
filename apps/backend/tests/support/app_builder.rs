use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use backend::routes;
use backend::state::app_state::AppState;
use backend::AppError;

/// Wraps an `AppState` in the server's middleware stack for in-process requests.
pub struct TestAppBuilder {
    state: AppState,
    routes: fn(&mut web::ServiceConfig),
}

impl TestAppBuilder {
    /// Starts with no routes mounted; every request 404s until routes are added.
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            routes: |_| {},
        }
    }

    /// Mount `/health` and `/api/v1/courses` exactly as `main` does.
    pub fn with_prod_routes(mut self) -> Self {
        self.routes = routes::configure;
        self
    }

    pub async fn build(
        self,
    ) -> Result<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>, AppError>
    {
        let app = App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state))
            .configure(self.routes);

        Ok(test::init_service(app).await)
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
