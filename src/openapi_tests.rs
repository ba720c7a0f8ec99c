use crate::schemas::ApiDoc;
use utoipa::OpenApi;
use utoipa::openapi::{PathItemType, RefOr, schema::Schema};

#[test]
fn test_openapi_schema_generation() {
    let openapi = ApiDoc::openapi();

    let components = openapi.components.as_ref().unwrap();
    for name in [
        "ErrorResponse",
        "HealthResponse",
        "ProductDto",
        "ProfileDto",
        "SignupRequest",
        "CreateProductRequest",
    ] {
        assert!(components.schemas.contains_key(name), "missing schema {name}");
    }

    assert!(serde_json::to_string(&openapi).is_ok());
}

#[test]
fn test_error_response_schema_structure() {
    let openapi = ApiDoc::openapi();
    let components = openapi.components.as_ref().unwrap();
    let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

    if let RefOr::T(Schema::Object(obj)) = error_response_schema {
        let properties = &obj.properties;
        assert!(properties.contains_key("error"));
        assert!(properties.contains_key("code"));
        assert!(properties.contains_key("success"));
    } else {
        panic!("ErrorResponse should be an object schema");
    }
}

#[test]
fn test_product_schema_hides_views() {
    let openapi = ApiDoc::openapi();
    let components = openapi.components.as_ref().unwrap();

    if let Some(RefOr::T(Schema::Object(obj))) = components.schemas.get("ProductDto") {
        assert!(obj.properties.contains_key("like_user_counter"));
        assert!(obj.properties.contains_key("hashtags"));
        assert!(!obj.properties.contains_key("views"));
    } else {
        panic!("ProductDto should be an object schema");
    }
}

#[test]
fn test_every_route_is_documented() {
    let openapi = ApiDoc::openapi();
    let paths = &openapi.paths.paths;

    let expected = [
        ("/health", PathItemType::Get),
        ("/api/v1/accounts/signup", PathItemType::Post),
        ("/api/v1/accounts/login", PathItemType::Post),
        ("/api/v1/accounts/profile", PathItemType::Get),
        ("/api/v1/accounts/profile", PathItemType::Put),
        ("/api/v1/accounts/change-password", PathItemType::Post),
        ("/api/v1/accounts/resign", PathItemType::Delete),
        ("/api/v1/accounts/{account_id}/follow", PathItemType::Post),
        ("/api/v1/products", PathItemType::Get),
        ("/api/v1/products", PathItemType::Post),
        ("/api/v1/products/categories", PathItemType::Get),
        ("/api/v1/products/{product_id}", PathItemType::Get),
        ("/api/v1/products/{product_id}", PathItemType::Put),
        ("/api/v1/products/{product_id}", PathItemType::Delete),
        ("/api/v1/products/{product_id}/like", PathItemType::Post),
        ("/api/v1/products/{product_id}/like", PathItemType::Delete),
    ];

    for (path, method) in expected {
        let item = paths
            .get(path)
            .unwrap_or_else(|| panic!("{path} is not documented"));
        assert!(
            item.operations.contains_key(&method),
            "{path} lacks an operation"
        );
    }
}

#[test]
fn test_all_error_responses_reference_correct_schema() {
    let openapi = ApiDoc::openapi();
    let openapi_json = serde_json::to_string(&openapi).unwrap();

    assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
    assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
    assert!(openapi_json.contains("#/components/schemas/ErrorResponse"));
}
