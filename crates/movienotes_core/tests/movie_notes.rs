use movienotes_core::db::open_db_in_memory;
use movienotes_core::{
    CreateNoteRequest, Entity, NewUser, NoteRepository, NoteService, NoteUpdate, RepoError,
    ServiceError, SqliteNoteRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::{params, Connection};

fn seed_user(conn: &mut Connection, username: &str) -> i64 {
    let mut repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(
        &NewUser::new(username, format!("{username}@x.com"), "digest", None).unwrap(),
    )
    .unwrap()
    .id
}

fn request(title: &str, rating: i64, user_id: i64, tags: &[&str]) -> CreateNoteRequest {
    CreateNoteRequest {
        title: Some(title.to_string()),
        description: None,
        rating: Some(rating),
        user_id: Some(user_id),
        tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_note_with_tags_then_read_back_with_associations() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let created = service
        .create_note(request("Dune", 5, user_id, &["scifi", "epic"]))
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.rating.value(), 5);
    assert!(created.tags.is_none());

    let tags = service.note_tags(created.id).unwrap();
    let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["scifi", "epic"]);
    assert!(tags.iter().all(|tag| tag.note_id == created.id));
}

#[test]
fn create_note_for_missing_user_is_not_found_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);

        let err = service
            .create_note(request("Dune", 5, 42, &["scifi"]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(Entity::User)));

        let mut missing_owner = request("Dune", 5, 1, &[]);
        missing_owner.user_id = None;
        let err = service.create_note(missing_owner).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(Entity::User)));
    }

    assert_eq!(count_rows(&conn, "movie_notes"), 0);
    assert_eq!(count_rows(&conn, "movie_tags"), 0);
}

#[test]
fn rating_bounds_are_enforced_at_persistence() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);

        for rating in [1, 5] {
            service
                .create_note(request("Ok", rating, user_id, &[]))
                .unwrap();
        }
        for rating in [0, 6] {
            let err = service
                .create_note(request("Bad", rating, user_id, &["tag"]))
                .unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Repo(RepoError::Validation(_))
            ));
        }
    }

    assert_eq!(count_rows(&conn, "movie_notes"), 2);
    assert_eq!(count_rows(&conn, "movie_tags"), 0);
}

#[test]
fn blank_tag_in_batch_rolls_back_the_whole_note() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);
        let err = service
            .create_note(request("Dune", 4, user_id, &["scifi", "  "]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::Validation(_))));
    }

    assert_eq!(count_rows(&conn, "movie_notes"), 0);
    assert_eq!(count_rows(&conn, "movie_tags"), 0);
}

#[test]
fn list_notes_attaches_tags_and_is_repeatable() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    service
        .create_note(request("Dune", 5, user_id, &["scifi"]))
        .unwrap();
    service.create_note(request("Heat", 4, user_id, &[])).unwrap();

    let first = service.list_notes().unwrap();
    let second = service.list_notes().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].title, "Dune");
    assert_eq!(first[0].tags.as_ref().map(Vec::len), Some(1));
    assert_eq!(first[1].tags, Some(Vec::new()));
}

#[test]
fn partial_update_overwrites_only_present_keys() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let mut create = request("Dune", 3, user_id, &["scifi"]);
    create.description = Some("spice".to_string());
    let created = service.create_note(create).unwrap();

    let update: NoteUpdate = serde_json::from_str(r#"{"rating": 5}"#).unwrap();
    let updated = service.update_note(created.id, &update).unwrap();
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.description.as_deref(), Some("spice"));
    assert_eq!(updated.rating.value(), 5);
    assert!(updated.tags.is_none());

    let update: NoteUpdate =
        serde_json::from_str(r#"{"title": "Dune: Part One", "description": null}"#).unwrap();
    let updated = service.update_note(created.id, &update).unwrap();
    assert_eq!(updated.title, "Dune: Part One");
    assert_eq!(updated.description, None);
    assert_eq!(updated.rating.value(), 5);
}

#[test]
fn update_with_falsy_values_fails_and_keeps_stored_note() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let created = service.create_note(request("Dune", 3, user_id, &[])).unwrap();

    for body in [r#"{"rating": 0}"#, r#"{"title": ""}"#, r#"{"rating": 6}"#] {
        let update: NoteUpdate = serde_json::from_str(body).unwrap();
        let err = service.update_note(created.id, &update).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::Validation(_))));
    }

    let stored = service.get_note(created.id, false).unwrap();
    assert_eq!(stored.title, "Dune");
    assert_eq!(stored.rating.value(), 3);
}

#[test]
fn update_missing_note_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let err = service
        .update_note(7, &NoteUpdate::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(Entity::MovieNote)));
}

#[test]
fn delete_note_cascades_to_all_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let mut note_ids = Vec::new();
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);
        for tag_count in [0_usize, 1, 5] {
            let tags: Vec<String> = (0..tag_count).map(|idx| format!("tag-{idx}")).collect();
            let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
            let note = service
                .create_note(request("Note", 3, user_id, &tag_refs))
                .unwrap();
            note_ids.push(note.id);
        }
        for id in &note_ids {
            service.delete_note(*id).unwrap();
        }

        let err = service.note_tags(note_ids[2]).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(Entity::MovieNote)));
        let err = service.delete_note(note_ids[0]).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(Entity::MovieNote)));
    }

    for id in note_ids {
        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM movie_tags WHERE note_id = ?1;",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
    }
}

#[test]
fn repository_get_note_without_associations_leaves_tags_unset() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let created = service
        .create_note(request("Dune", 5, user_id, &["scifi"]))
        .unwrap();

    let plain = service.get_note(created.id, false).unwrap();
    assert!(plain.tags.is_none());
    let loaded = service.get_note(created.id, true).unwrap();
    assert_eq!(loaded.tags.map(|tags| tags.len()), Some(1));
}

#[test]
fn repository_rejects_invalid_persisted_rating() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn, "al");
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO movie_notes (title, rating, user_id) VALUES ('Broken', 9, ?1);",
        params![user_id],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let err = repo.list_notes(false).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
