use crate::operations;
use crate::{BoxId, Currency, Error, ErrorKind, EventId, MemoryRepository, Repository};

async fn setup_linked(repo: &mut MemoryRepository, currency: &str) -> (EventId, BoxId) {
    let event = operations::create_event(repo, "Charity One", currency)
        .await
        .unwrap();
    let b = operations::register_box(repo).await.unwrap();
    operations::assign_box(repo, event.id(), b.id()).await.unwrap();
    (event.id(), b.id())
}

#[tokio::test]
async fn test_register_and_list_boxes() {
    let mut repo = MemoryRepository::new();
    let first = operations::register_box(&mut repo).await.unwrap();
    let second = operations::register_box(&mut repo).await.unwrap();

    let boxes = operations::list_boxes(&mut repo).await.unwrap();

    assert_eq!(boxes.len(), 2);
    assert!(boxes.iter().any(|b| b.id() == first.id()));
    assert!(boxes.iter().any(|b| b.id() == second.id()));
    assert!(boxes.iter().all(|b| b.is_empty()));
}

#[tokio::test]
async fn test_deposit_persists_and_validates() {
    let mut repo = MemoryRepository::new();
    let b = operations::register_box(&mut repo).await.unwrap();

    operations::deposit(&mut repo, b.id(), Some("PLN"), 100.0)
        .await
        .unwrap();
    let updated = operations::deposit(&mut repo, b.id(), Some("EUR"), 50.0)
        .await
        .unwrap();

    assert!(!updated.is_empty());
    let stored = operations::get_box(&mut repo, b.id()).await.unwrap();
    assert_eq!(stored.balance_of(Currency::Pln), 100.0);
    assert_eq!(stored.balance_of(Currency::Eur), 50.0);

    let err = operations::deposit(&mut repo, b.id(), Some("PLN"), -5.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = operations::deposit(&mut repo, b.id(), None, 5.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let stored = operations::get_box(&mut repo, b.id()).await.unwrap();
    assert_eq!(stored.balance_of(Currency::Pln), 100.0);
}

#[tokio::test]
async fn test_deposit_into_unknown_box_is_not_found() {
    let mut repo = MemoryRepository::new();
    let missing = BoxId::new();

    // Lookup comes before argument validation.
    let err = operations::deposit(&mut repo, missing, Some("XXX"), -1.0)
        .await
        .unwrap_err();

    assert_eq!(err, Error::BoxNotFound(missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_empty_box() {
    let mut repo = MemoryRepository::new();
    let b = operations::register_box(&mut repo).await.unwrap();
    operations::deposit(&mut repo, b.id(), Some("GBP"), 9.0)
        .await
        .unwrap();

    let emptied = operations::empty_box(&mut repo, b.id()).await.unwrap();

    assert!(emptied.is_empty());
    assert!(operations::get_box(&mut repo, b.id())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_create_event_validates_currency() {
    let mut repo = MemoryRepository::new();

    let err = operations::create_event(&mut repo, "Bad", "USD")
        .await
        .unwrap_err();

    assert_eq!(err, Error::InvalidCurrency("USD".into()));
    assert!(operations::list_events(&mut repo).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_default_event() {
    let mut repo = MemoryRepository::new();
    let event = operations::create_default_event(&mut repo).await.unwrap();
    let stored = operations::get_event(&mut repo, event.id()).await.unwrap();
    assert_eq!(stored, event);
    assert_eq!(stored.currency(), Currency::Pln);
}

#[tokio::test]
async fn test_assign_persists_both_sides() {
    let mut repo = MemoryRepository::new();
    let (event_id, box_id) = setup_linked(&mut repo, "PLN").await;

    let event = operations::get_event(&mut repo, event_id).await.unwrap();
    let b = operations::get_box(&mut repo, box_id).await.unwrap();

    assert_eq!(event.collection_box(), Some(box_id));
    assert_eq!(b.assigned_event(), Some(event_id));
    let linked = operations::box_of_event(&mut repo, event_id).await.unwrap();
    assert_eq!(linked.map(|b| b.id()), Some(box_id));
}

#[tokio::test]
async fn test_assign_unknown_ids_are_not_found() {
    let mut repo = MemoryRepository::new();
    let event = operations::create_default_event(&mut repo).await.unwrap();
    let b = operations::register_box(&mut repo).await.unwrap();

    let err = operations::assign_box(&mut repo, EventId::new(), b.id())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = operations::assign_box(&mut repo, event.id(), BoxId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = operations::assign_box(&mut repo, event.id(), BoxId::nil())
        .await
        .unwrap_err();
    assert_eq!(err, Error::MissingBox);
}

#[tokio::test]
async fn test_failed_assign_saves_nothing() {
    let mut repo = MemoryRepository::new();
    let event = operations::create_default_event(&mut repo).await.unwrap();
    let b = operations::register_box(&mut repo).await.unwrap();
    operations::deposit(&mut repo, b.id(), Some("EUR"), 1.0)
        .await
        .unwrap();

    let err = operations::assign_box(&mut repo, event.id(), b.id())
        .await
        .unwrap_err();

    assert_eq!(err, Error::BoxNotEmpty(b.id()));
    let event = operations::get_event(&mut repo, event.id()).await.unwrap();
    let b = operations::get_box(&mut repo, b.id()).await.unwrap();
    assert_eq!(event.collection_box(), None);
    assert_eq!(b.assigned_event(), None);
}

#[tokio::test]
async fn test_box_cannot_join_second_event() {
    let mut repo = MemoryRepository::new();
    let (_, box_id) = setup_linked(&mut repo, "PLN").await;
    let other = operations::create_event(&mut repo, "Other", "EUR")
        .await
        .unwrap();

    let err = operations::assign_box(&mut repo, other.id(), box_id)
        .await
        .unwrap_err();

    assert_eq!(err, Error::BoxAlreadyLinked(box_id));
    let other = operations::get_event(&mut repo, other.id()).await.unwrap();
    assert_eq!(other.collection_box(), None);
}

#[tokio::test]
async fn test_unassign_clears_both_sides_and_empties_box() {
    let mut repo = MemoryRepository::new();
    let (event_id, box_id) = setup_linked(&mut repo, "PLN").await;
    operations::deposit(&mut repo, box_id, Some("EUR"), 20.0)
        .await
        .unwrap();

    operations::unassign_box(&mut repo, event_id).await.unwrap();

    let event = operations::get_event(&mut repo, event_id).await.unwrap();
    let b = operations::get_box(&mut repo, box_id).await.unwrap();
    assert_eq!(event.collection_box(), None);
    assert_eq!(b.assigned_event(), None);
    assert!(b.is_empty());
    assert_eq!(event.account_balance(), 0.0);

    let err = operations::unassign_box(&mut repo, event_id)
        .await
        .unwrap_err();
    assert_eq!(err, Error::NoBoxAssigned(event_id));
}

#[tokio::test]
async fn test_transfer_persists_event_and_box() {
    let mut repo = MemoryRepository::new();
    let (event_id, box_id) = setup_linked(&mut repo, "PLN").await;
    operations::deposit(&mut repo, box_id, Some("EUR"), 100.0)
        .await
        .unwrap();

    let event = operations::transfer(&mut repo, event_id).await.unwrap();

    assert_eq!(event.account_balance(), 450.0);
    let stored = operations::get_event(&mut repo, event_id).await.unwrap();
    assert_eq!(stored.account_balance(), 450.0);
    let b = operations::get_box(&mut repo, box_id).await.unwrap();
    assert_eq!(b.balance_of(Currency::Eur), 0.0);
    assert_eq!(b.assigned_event(), Some(event_id));
}

#[tokio::test]
async fn test_transfer_with_empty_box_succeeds() {
    let mut repo = MemoryRepository::new();
    let (event_id, _) = setup_linked(&mut repo, "PLN").await;

    let event = operations::transfer(&mut repo, event_id).await.unwrap();

    assert_eq!(event.account_balance(), 0.0);
}

#[tokio::test]
async fn test_transfer_without_box_is_invalid_state_not_not_found() {
    let mut repo = MemoryRepository::new();
    let event = operations::create_event(&mut repo, "Lonely", "GBP")
        .await
        .unwrap();

    let err = operations::transfer(&mut repo, event.id()).await.unwrap_err();

    assert_eq!(err, Error::NoBoxAssigned(event.id()));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_transfer_unknown_event_is_not_found() {
    let mut repo = MemoryRepository::new();
    let id = EventId::new();
    let err = operations::transfer(&mut repo, id).await.unwrap_err();
    assert_eq!(err, Error::EventNotFound(id));
}

#[tokio::test]
async fn test_deleting_linked_entities_is_blocked() {
    let mut repo = MemoryRepository::new();
    let (event_id, box_id) = setup_linked(&mut repo, "EUR").await;

    let err = operations::unregister_box(&mut repo, box_id)
        .await
        .unwrap_err();
    assert_eq!(err, Error::BoxStillAssigned(box_id));
    let err = operations::delete_event(&mut repo, event_id)
        .await
        .unwrap_err();
    assert_eq!(err, Error::EventStillHasBox(event_id));
    assert!(repo.box_exists(box_id).await.unwrap());
    assert!(repo.event_exists(event_id).await.unwrap());

    operations::unassign_box(&mut repo, event_id).await.unwrap();
    operations::unregister_box(&mut repo, box_id).await.unwrap();
    operations::delete_event(&mut repo, event_id).await.unwrap();
    assert!(!repo.box_exists(box_id).await.unwrap());
    assert!(!repo.event_exists(event_id).await.unwrap());
}

#[tokio::test]
async fn test_delete_unknown_entities_is_not_found() {
    let mut repo = MemoryRepository::new();
    let box_id = BoxId::new();
    let event_id = EventId::new();
    assert_eq!(
        operations::unregister_box(&mut repo, box_id).await,
        Err(Error::BoxNotFound(box_id))
    );
    assert_eq!(
        operations::delete_event(&mut repo, event_id).await,
        Err(Error::EventNotFound(event_id))
    );
}

#[tokio::test]
async fn test_financial_report_lists_every_event() {
    let mut repo = MemoryRepository::new();
    let (event_id, box_id) = setup_linked(&mut repo, "EUR").await;
    operations::create_event(&mut repo, "Second", "GBP")
        .await
        .unwrap();
    operations::deposit(&mut repo, box_id, Some("PLN"), 100.0)
        .await
        .unwrap();
    operations::transfer(&mut repo, event_id).await.unwrap();

    let report = operations::financial_report(&mut repo).await.unwrap();

    assert_eq!(report.len(), 2);
    let first = report.iter().find(|e| e.name == "Charity One").unwrap();
    assert_eq!(first.currency, Currency::Eur);
    assert_eq!(first.account_balance, 22.0);
    let second = report.iter().find(|e| e.name == "Second").unwrap();
    assert_eq!(second.account_balance, 0.0);
}
