use std::sync::Arc;

use assert_matches::assert_matches;
use comics_creator_lib::{
    init,
    models::PhotoSource,
    permissions::StaticPermissions,
    repository::ComicRepository,
    settings::WorkflowSettings,
    AppState, ComicsError, Outcome,
};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn app(dir: &tempfile::TempDir) -> AppState {
    init(dir.path(), Arc::new(StaticPermissions::granted())).unwrap()
}

#[tokio::test(start_paused = true)]
async fn photos_become_characters_become_a_comic() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let session = app.new_session();

    let first = session
        .add_photo(PNG_HEADER.to_vec(), PhotoSource::Camera)
        .await
        .unwrap();
    let second = session
        .add_photo(vec![0xFF, 0xD8, 0xFF, 0xE0], PhotoSource::Gallery)
        .await
        .unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.selected_count, 2);
    assert!(snapshot.can_continue_to_characters);
    assert!(snapshot.photos[0].is_from_camera);
    assert_eq!(snapshot.photos[0].mime_type.as_deref(), Some("image/png"));
    assert!(!snapshot.photos[1].is_from_camera);

    assert_eq!(session.proceed_to_characters().await.unwrap(), 2);
    session.generate_characters().await.unwrap();
    session.wait_for_characters().await.unwrap();

    let characters = session.generated_characters().await;
    let ids: Vec<String> = characters.iter().map(|c| c.id.clone()).collect();
    assert_eq!(
        ids,
        vec![format!("character_{first}"), format!("character_{second}")]
    );
    assert_eq!(characters[0].original_photo_id, first);

    let committed = session
        .commit_characters(app.characters.as_ref())
        .await
        .success()
        .unwrap();
    assert_eq!(committed, ids);

    let comic = app
        .assembler
        .create_comic("coffee-break", &committed, "  Office Wars ")
        .await
        .success()
        .unwrap();
    let template = app
        .comics
        .get_template_by_id("coffee-break")
        .await
        .success()
        .unwrap();

    assert_eq!(comic.title, "Office Wars");
    assert_eq!(comic.template_id, "coffee-break");
    assert_eq!(comic.metadata.characters_used, 2);
    assert_eq!(comic.metadata.total_frames, template.frames.len());
    assert_eq!(comic.metadata.ai_processing_version, "1.0");
    let bubble_owners: Vec<&str> = comic.customized_frames[0]
        .custom_speech_bubbles
        .iter()
        .map(|bubble| bubble.character_id.as_str())
        .collect();
    assert_eq!(bubble_owners, vec![ids[0].as_str(), ids[1].as_str()]);

    let edited = app
        .assembler
        .edit_bubble_text(&comic.id, "coffee-break-1", "coffee-break-1-a", "Mine.")
        .await
        .success()
        .unwrap();
    let bubble = &edited.customized_frames[0].custom_speech_bubbles[0];
    assert_eq!(bubble.custom_text.as_deref(), Some("Mine."));
    assert!(bubble.is_edited);

    let link = app.comics.share_comic(&comic.id).await.success().unwrap();
    assert!(link.contains(&comic.id));
    let shared = app.comics.get_comic_by_id(&comic.id).await.success().unwrap();
    assert!(shared.is_shared);

    session.end().await.unwrap();
    assert!(session.snapshot().await.photos.is_empty());
}

#[tokio::test]
async fn assembly_rejects_bad_requests() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let missing = app
        .assembler
        .create_comic("no-such-template", &["a".to_string()], "")
        .await;
    assert_matches!(missing, Outcome::Error(ComicsError::NotFound(_)));

    let too_many = app
        .assembler
        .create_comic(
            "coffee-break",
            &["a".to_string(), "b".to_string(), "c".to_string()],
            "",
        )
        .await;
    assert_matches!(
        too_many,
        Outcome::Error(ComicsError::InvalidArgument(message))
            if message == "Template requires 2-2 characters, but 3 provided"
    );

    let unknown_character = app
        .assembler
        .create_comic("coffee-break", &["a".to_string(), "b".to_string()], "")
        .await;
    assert_matches!(unknown_character, Outcome::Error(ComicsError::NotFound(_)));
}

#[tokio::test]
async fn settings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = WorkflowSettings {
        generation_delay_ms: 10,
        max_photos_per_import: 2,
        max_photos: 3,
    };
    app(&dir).settings.update_workflow(settings.clone()).unwrap();

    let restarted = app(&dir);
    assert_eq!(restarted.settings.workflow(), settings);

    let session = restarted.new_session();
    let added = session
        .import_photos(vec![vec![1], vec![2], vec![3]], PhotoSource::Gallery)
        .await
        .success()
        .unwrap();
    assert_eq!(added.len(), 2);
}

#[tokio::test]
async fn template_queries_use_bundled_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let popular = app.templates.all(true).await.success().unwrap();
    assert!(popular.iter().all(|template| template.is_popular));
    assert!(!popular.is_empty());

    let solo = app.templates.for_character_count(1).await.success().unwrap();
    let solo_ids: Vec<&str> = solo.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(solo_ids, vec!["hero-landing"]);
}
