//! Place screen flows: confirmed deletes and the deferred image upload.

mod support;

use std::sync::Arc;

use mockall::predicate::eq;
use serde_json::{json, Value};

use admin_lib::{AdminPage, FormPhase, PlaceEditor, Places};
use common::{AppError, ClientConfig};
use domain::ImageDraft;

use support::{photo, place_with_image_json, places_json, uploaded, with_id, MockApi, MockHost};

fn api_listing(places: Value) -> MockApi {
    let mut api = MockApi::new();
    api.expect_get().returning(move |path| match path {
        "/api/places" => Ok(places.clone()),
        "/api/categories" => Ok(json!([{"id": 1, "name": "Food", "subcategories": []}])),
        "/api/features" => Ok(json!([{"id": 4, "name": "Terrace"}])),
        other => Err(AppError::Api {
            status: 404,
            message: format!("unexpected path {}", other),
        }),
    });
    api
}

fn ids(page: &mut AdminPage<Places>) -> Vec<i64> {
    page.view().rows.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let mut api = api_listing(places_json());
    api.expect_delete().never();

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    assert!(page.request_delete(&3));
    assert_eq!(page.pending_delete(), Some(&3));
    page.cancel_delete();

    assert!(!page.confirm_delete().await.unwrap());
    assert_eq!(page.store().items().len(), 3);
}

#[tokio::test]
async fn test_confirmed_delete_removes_row() {
    let mut api = api_listing(places_json());
    api.expect_delete()
        .with(eq("/api/places/3"))
        .times(1)
        .returning(|_| Ok(Value::Null));

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();
    assert!(ids(&mut page).contains(&3));

    assert!(page.request_delete(&3));
    assert!(page.confirm_delete().await.unwrap());

    assert!(!ids(&mut page).contains(&3));
    assert!(page.store().get(&3).is_none());

    // A second delete of the same row is a no-op: nothing is sent.
    assert!(!page.request_delete(&3));
    assert!(!page.confirm_delete().await.unwrap());
    assert!(page.store().error().is_none());
}

#[tokio::test]
async fn test_failed_delete_keeps_row() {
    let mut api = api_listing(places_json());
    api.expect_delete()
        .times(1)
        .returning(|_| Err(AppError::Api { status: 500, message: "Constraint violation".into() }));

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();
    assert!(page.request_delete(&3));

    assert!(page.confirm_delete().await.is_err());
    assert!(page.store().get(&3).is_some());
    assert_eq!(page.store().error().as_deref(), Some("Constraint violation"));
}

#[tokio::test]
async fn test_images_upload_only_on_save() {
    let mut api = api_listing(places_json());
    api.expect_put()
        .withf(|path, body| {
            let images = body["images"].as_array().cloned().unwrap_or_default();
            path == "/api/places/3"
                && images.len() == 2
                && images.iter().all(|i| i["publicId"].is_string() && i.get("isTemp").is_none())
                && images.iter().filter(|i| i["isFeatured"] == true).count() == 1
        })
        .times(1)
        .returning(|_, body| Ok(with_id(body, 3)));

    let mut host = MockHost::new();
    host.expect_upload()
        .times(2)
        .returning(|file| Ok(uploaded(file)));

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(host));
    editor.open_edit(&mut page, 3).await.unwrap();
    assert!(editor.is_interactive(&page));

    let first = editor.add_file(&mut page, photo("front.jpg"), "Front").unwrap();
    editor.add_file(&mut page, photo("inside.jpg"), "Inside").unwrap();

    let draft = page.form().draft();
    assert_eq!(draft.pending_images().count(), 2);
    assert!(matches!(&draft.images[first], ImageDraft::Pending(p) if p.preview_url.starts_with("blob:")));
    assert_eq!(draft.featured, Some(first));
    assert_eq!(editor.previews().len(), 2);

    let saved = editor.save(&mut page).await.unwrap();

    assert_eq!(saved.images.len(), 2);
    assert!(saved.images.iter().all(|i| i.public_id.is_some()));
    assert_eq!(
        saved.featured().map(|i| i.url.as_str()),
        Some("https://res.example.com/image/upload/v42/places/front.jpg")
    );
    assert!(editor.warnings().is_empty());
    assert!(editor.previews().is_empty());
    assert_eq!(page.form().phase(), FormPhase::Closed);
}

#[tokio::test]
async fn test_cancel_keeps_persisted_images_on_host() {
    let api = api_listing(place_with_image_json());
    let mut host = MockHost::new();
    host.expect_upload().never();
    host.expect_delete().never();

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(host));
    editor.open_edit(&mut page, 3).await.unwrap();
    editor.add_file(&mut page, photo("new.jpg"), "").unwrap();
    assert!(editor.remove_image(&mut page, 0).unwrap());

    editor.cancel(&mut page);

    assert_eq!(page.form().phase(), FormPhase::Closed);
    assert!(editor.previews().is_empty());
    assert_eq!(page.store().get(&3).map(|p| p.images.len()), Some(1));
}

#[tokio::test]
async fn test_removed_image_deleted_after_save() {
    let mut api = api_listing(place_with_image_json());
    api.expect_put()
        .withf(|_, body| body["images"] == json!([]))
        .times(1)
        .returning(|_, body| Ok(with_id(body, 3)));

    let mut host = MockHost::new();
    host.expect_delete()
        .with(eq("places/old"))
        .times(1)
        .returning(|_| Ok(true));

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(host));
    editor.open_edit(&mut page, 3).await.unwrap();
    editor.remove_image(&mut page, 0).unwrap();

    let saved = editor.save(&mut page).await.unwrap();
    assert!(saved.images.is_empty());
    assert!(saved.featured().is_none());
    assert!(page.store().get(&3).unwrap().images.is_empty());
}

#[tokio::test]
async fn test_failed_upload_is_a_warning() {
    let mut api = api_listing(places_json());
    api.expect_put()
        .withf(|_, body| body["images"].as_array().map(Vec::len) == Some(1))
        .times(1)
        .returning(|_, body| Ok(with_id(body, 3)));

    let mut host = MockHost::new();
    host.expect_upload().times(2).returning(|file| {
        if file.name == "huge.jpg" {
            Err(AppError::image_host("File too large"))
        } else {
            Ok(uploaded(file))
        }
    });

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(host));
    editor.open_edit(&mut page, 3).await.unwrap();
    editor.add_file(&mut page, photo("huge.jpg"), "").unwrap();
    editor.add_file(&mut page, photo("ok.jpg"), "").unwrap();

    let saved = editor.save(&mut page).await.unwrap();
    assert_eq!(saved.images.len(), 1);
    assert_eq!(editor.warnings().len(), 1);
    assert!(editor.warnings()[0].contains("huge.jpg"));
}

#[tokio::test]
async fn test_invalid_place_uploads_nothing() {
    let api = api_listing(places_json());
    let mut host = MockHost::new();
    host.expect_upload().never();

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(host));
    editor.open_add(&mut page).await.unwrap();
    editor.add_file(&mut page, photo("front.jpg"), "").unwrap();
    page.form_mut().draft_mut().unwrap().rating = Some(7.0);

    let err = editor.save(&mut page).await.unwrap_err();
    let fields = err.field_errors().unwrap();
    assert!(fields.contains("name"));
    assert!(fields.contains("address"));
    assert!(fields.contains("rating"));
    assert_eq!(page.form().phase(), FormPhase::Drafting);
    assert!(page.form().draft().has_pending_images());
}

#[tokio::test]
async fn test_form_stays_closed_when_reference_data_fails() {
    let mut api = MockApi::new();
    api.expect_get().returning(|path| match path {
        "/api/places" => Ok(json!([])),
        "/api/features" => Ok(json!([])),
        _ => Err(AppError::network("connection reset")),
    });

    let mut page = AdminPage::<Places>::new(Arc::new(api), &ClientConfig::default());
    page.load().await.unwrap();

    let mut editor = PlaceEditor::new(Arc::new(MockHost::new()));
    assert!(editor.open_add(&mut page).await.is_err());
    assert_eq!(page.form().phase(), FormPhase::Closed);
    assert!(!editor.is_interactive(&page));
}
