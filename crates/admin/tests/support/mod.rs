//! Shared mocks and fixtures for the admin integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use admin_lib::{ApiTransport, ImageHost};
use common::AppResult;
use domain::{LocalFile, UploadedImage};

mock! {
    pub Api {}

    #[async_trait]
    impl ApiTransport for Api {
        async fn get(&self, path: &str) -> AppResult<Value>;
        async fn post(&self, path: &str, body: Value) -> AppResult<Value>;
        async fn put(&self, path: &str, body: Value) -> AppResult<Value>;
        async fn delete(&self, path: &str) -> AppResult<Value>;
    }
}

mock! {
    pub Host {}

    #[async_trait]
    impl ImageHost for Host {
        async fn upload(&self, file: &LocalFile) -> AppResult<UploadedImage>;
        async fn delete(&self, public_id: &str) -> AppResult<bool>;
    }
}

pub fn places_json() -> Value {
    json!({ "data": [
        {"id": 1, "name": "Blue Cafe", "description": "Espresso and cake", "address": "2 Main St",
         "rating": 4.5, "priceLevel": "$", "categoryIds": [1], "isOpenNow": true},
        {"id": 2, "name": "Night Owl", "description": "Cocktail bar", "address": "9 Dock Rd",
         "rating": null, "priceLevel": "$$$", "categoryIds": [2], "isOpenNow": false},
        {"id": 3, "name": "Harbor Grill", "description": "Seafood grill", "address": "1 Pier",
         "rating": 4.1, "priceLevel": "", "categoryIds": [1, 2], "isOpenNow": true,
         "images": []}
    ]})
}

pub fn place_with_image_json() -> Value {
    json!([{
        "id": 3,
        "name": "Harbor Grill",
        "address": "1 Pier",
        "images": [{
            "id": 11,
            "url": "https://res.example.com/image/upload/v17/places/old.jpg",
            "altText": "Terrace",
            "publicId": null,
            "isFeatured": true
        }]
    }])
}

pub fn photo(name: &str) -> LocalFile {
    LocalFile {
        name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

pub fn uploaded(file: &LocalFile) -> UploadedImage {
    let stem = file.name.trim_end_matches(".jpg");
    UploadedImage {
        url: format!("https://res.example.com/image/upload/v42/places/{}.jpg", stem),
        public_id: format!("places/{}", stem),
        width: Some(1200),
        height: Some(800),
        format: Some("jpg".to_string()),
    }
}

/// Echo a create/update body back with an id, like the backend does.
pub fn with_id(mut body: Value, id: i64) -> Value {
    body["id"] = json!(id);
    body
}
