use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;

/// OpenAPI documentation for the geoweather API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "geoweather API",
        version = "1.0.0",
        description = "Current weather and daily forecasts for a city, a coordinate pair, or an IP address, backed by OpenWeatherMap.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::weather::handlers::get_current_weather,
        crate::weather::handlers::get_daily_weather,
    ),
    tags(
        (name = "weather", description = "Current weather and daily forecasts")
    ),
    components(
        schemas(
            ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
