//! Integration tests for collection queries, counts and deletes.

mod fixtures;

use bark_rust::{
    CollectionHandle, Context, DatabaseHandle, DocumentError, Engine, EngineConfig, Filter,
    FindOptions, InMemoryDriver, Model, SortOrder, StoreDriver, UpdateSpec,
};
use fixtures::{names, seed, Dog, Owner};
use serde_json::json;

#[test]
fn empty_filter_returns_every_document() {
    let f = seed("test-find", &[("Fido", 3), ("Rex", 5), ("Spot", 3)]);
    let all = f.dogs.find(&Filter::all(), &FindOptions::new(), &f.ctx).unwrap();
    assert_eq!(names(&all), vec!["Fido", "Rex", "Spot"]);
    assert_eq!(names(&f.dogs.all(&f.ctx).unwrap()), names(&all));
}

#[test]
fn plural_query_matching_nothing_is_empty() {
    let f = seed("test-find", &[("Fido", 3)]);
    let none = f
        .dogs
        .find(&Filter::all().eq("name", "Nobody"), &FindOptions::new(), &f.ctx)
        .unwrap();
    assert!(none.is_empty());

    let empty = seed("test-empty", &[]);
    assert!(empty.dogs.all(&empty.ctx).unwrap().is_empty());
}

#[test]
fn singular_query_matching_nothing_is_not_found() {
    let f = seed("test-find-one", &[("Fido", 3)]);
    let err = f
        .dogs
        .find_one(&Filter::all().eq("name", "Nobody"), &f.ctx)
        .unwrap_err();
    assert_eq!(
        err,
        DocumentError::NotFound {
            collection: "dogs".into()
        }
    );
    assert!(f.dogs.get("missing", &f.ctx).unwrap_err().is_not_found());
}

#[test]
fn count_and_delete_many_by_age() {
    let f = seed("test-ages", &[("Fido", 3), ("Rex", 5), ("Spot", 3)]);
    assert_eq!(f.dogs.count(&Filter::all().eq("age", 3), &f.ctx).unwrap(), 2);

    let result = f.dogs.delete_many(&Filter::all().eq("age", 3), &f.ctx).unwrap();
    assert_eq!(result.deleted, 2);
    assert_eq!(result.matched, 0);
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 1);
}

#[test]
fn loaded_documents_know_their_collection() {
    let f = seed("test-names", &[("Fido", 3), ("Rex", 5)]);
    let all = f.dogs.all(&f.ctx).unwrap();
    assert!(all.iter().all(|d| d.collection_name() == "dogs"));

    let one = f.dogs.find_one(&Filter::all().eq("name", "Rex"), &f.ctx).unwrap();
    assert_eq!(one.collection_name(), "dogs");
    assert_eq!(one.id(), "0000000000000002");
}

#[test]
fn find_honours_sort_skip_and_limit() {
    let f = seed(
        "test-options",
        &[("Fido", 3), ("Rex", 5), ("Spot", 1), ("Max", 4)],
    );
    let options = FindOptions::new()
        .sort_by("age", SortOrder::Descending)
        .skip(1)
        .limit(2);
    let page = f.dogs.find(&Filter::all(), &options, &f.ctx).unwrap();
    assert_eq!(names(&page), vec!["Max", "Fido"]);
}

#[test]
fn find_and_count_reports_total_matches() {
    let f = seed("test-find-count", &[("Fido", 3), ("Rex", 5), ("Spot", 3)]);
    let (found, count) = f
        .dogs
        .find_and_count(
            &Filter::all().eq("age", 3),
            &FindOptions::new().limit(1),
            &f.ctx,
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(count, 2);
}

#[test]
fn parsed_filters_support_comparisons_membership_and_prefix() {
    let f = seed(
        "test-parsed",
        &[("Fido", 3), ("Finn", 7), ("Rex", 5), ("Spot", 9)],
    );

    let older = Filter::parse(&json!({"age": {"$gt": 3, "$lte": 7}})).unwrap();
    let found = f.dogs.find(&older, &FindOptions::new(), &f.ctx).unwrap();
    assert_eq!(names(&found), vec!["Finn", "Rex"]);

    let prefixed = Filter::parse(&json!({"name": {"$regex": "^Fi"}})).unwrap();
    assert_eq!(f.dogs.count(&prefixed, &f.ctx).unwrap(), 2);

    let chosen = Filter::parse(&json!({"name": {"$in": ["Rex", "Spot"]}})).unwrap();
    assert_eq!(f.dogs.count(&chosen, &f.ctx).unwrap(), 2);

    let young = Filter::all().lt("age", 5).gte("age", 3);
    assert_eq!(f.dogs.count(&young, &f.ctx).unwrap(), 1);
}

#[test]
fn nested_fields_are_queryable() {
    let f = seed("test-nested", &[("Fido", 3)]);
    let mut dog = f.dogs.new_model();
    dog.name = "Lassie".into();
    dog.age = 6;
    dog.owner = Some(Owner {
        name: "Timmy".into(),
    });
    f.dogs.save(&mut dog, &f.ctx).unwrap();

    let owned = f
        .dogs
        .find_one(&Filter::all().eq("owner.name", "Timmy"), &f.ctx)
        .unwrap();
    assert_eq!(owned.name, "Lassie");
    assert_eq!(owned.owner, dog.owner);
}

#[test]
fn delete_one_reports_zero_on_a_miss() {
    let f = seed("test-delete-one", &[("Fido", 3), ("Rex", 3)]);
    let first = f.dogs.delete_one(&Filter::all().eq("age", 3), &f.ctx).unwrap();
    assert_eq!(first.deleted, 1);
    let miss = f.dogs.delete_one(&Filter::all().eq("age", 99), &f.ctx).unwrap();
    assert_eq!(miss.deleted, 0);
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 1);
}

#[test]
fn clear_empties_test_databases() {
    let f = seed("test-clear", &[("Fido", 3), ("Rex", 5)]);
    assert_eq!(f.dogs.clear(&f.ctx).unwrap().deleted, 2);
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 0);
}

#[test]
fn clear_refuses_non_test_databases() {
    let f = seed("production", &[("Fido", 3)]);
    assert_eq!(
        f.dogs.clear(&f.ctx),
        Err(DocumentError::ClearRefused {
            database: "production".into()
        })
    );
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 1);
}

#[test]
fn clear_targets_the_context_database_not_the_cached_handle() {
    let f = seed("production", &[("Fido", 3), ("Rex", 5)]);
    let scratch = Context::new()
        .with_database("test-scratch")
        .with_now("2024-03-27T19:55:38.782Z");

    assert_eq!(f.dogs.clear(&scratch).unwrap().deleted, 0);
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 2);

    let scratch_dogs = f.engine.collection::<Dog>("dogs");
    let mut dog = scratch_dogs.new_model();
    dog.name = "Spot".into();
    scratch_dogs.save(&mut dog, &scratch).unwrap();
    assert_eq!(f.dogs.clear(&scratch).unwrap().deleted, 1);
    assert_eq!(scratch_dogs.count(&Filter::all(), &scratch).unwrap(), 0);
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 2);
}

#[test]
fn handles_are_resolved_once_and_shared() {
    let f = seed("test-cache", &[("Fido", 3)]);
    f.dogs.count(&Filter::all(), &f.ctx).unwrap();
    f.dogs.all(&f.ctx).unwrap();

    let other = f.engine.collection::<Dog>("dogs");
    assert_eq!(other.count(&Filter::all(), &f.ctx).unwrap(), 1);

    assert_eq!(f.driver.connect_count(), 1);
    assert_eq!(f.engine.registry().len(), 1);
    assert!(f.engine.registry().contains("test-cache"));
}

#[test]
fn forced_error_wins_over_a_cached_handle() {
    let f = seed("test-forced", &[("Fido", 3)]);
    f.dogs.resolve_handle(&f.ctx).unwrap();

    let ctx = f.ctx.clone().with_forced_error("mock db error");
    let injected = DocumentError::Injected("mock db error".into());
    assert_eq!(f.dogs.all(&ctx).err(), Some(injected.clone()));
    assert_eq!(f.dogs.count(&Filter::all(), &ctx).err(), Some(injected.clone()));
    assert_eq!(f.dogs.delete_many(&Filter::all(), &ctx).err(), Some(injected));
    assert_eq!(f.dogs.count(&Filter::all(), &f.ctx).unwrap(), 1);
}

#[test]
fn operations_without_a_database_fail() {
    let f = seed("test-missing", &[]);
    let fresh = f.engine.collection::<Dog>("dogs");
    assert_eq!(
        fresh.count(&Filter::all(), &Context::new()),
        Err(DocumentError::MissingContext("database name"))
    );
}

#[test]
fn store_failures_name_the_failed_action() {
    let f = seed("test-failing", &[("Fido", 3)]);
    f.driver.set_failing(true);
    match f.dogs.all(&f.ctx) {
        Err(DocumentError::Store(msg)) => assert_eq!(msg, "error fetching documents: store unavailable"),
        other => panic!("expected a store error, got {:?}", other.map(|d| d.len())),
    }
    assert!(matches!(
        f.dogs.delete_one(&Filter::all(), &f.ctx),
        Err(DocumentError::Store(_))
    ));
}

#[test]
fn undecodable_documents_surface_serde_errors() {
    let f = seed("test-decode", &[("Fido", 3)]);
    let raw = f
        .driver
        .connect("memory://local", "test-decode")
        .unwrap()
        .collection("dogs");
    raw.update_one(
        &Filter::by_id("broken"),
        &UpdateSpec::new().set("name", 42).set("age", "old"),
        true,
    )
    .unwrap();

    assert!(matches!(f.dogs.all(&f.ctx), Err(DocumentError::Serde(_))));
    assert_eq!(f.dogs.get("0000000000000001", &f.ctx).unwrap().name, "Fido");
}

#[test]
fn connect_default_uses_the_configured_database() {
    let driver = InMemoryDriver::new();
    let engine = Engine::new(
        driver.clone(),
        EngineConfig::new("memory://local").with_default_database("test-default"),
    );
    let handle = engine.connect_default().unwrap();
    assert_eq!(handle.name(), "test-default");

    let again = engine.connect_default().unwrap();
    assert!(std::sync::Arc::ptr_eq(&handle, &again));
    assert_eq!(driver.connect_count(), 1);
}
