mod common;

use common::{customer, id_of, raw, setup, stocked_store};
use rental_store::RepoError;
use rental_store::db::models::{
    EmployeeCreate, FeeCreate, FeeTypeCreate, FeeTypeUpdate, PaymentCreate, PromoCodeCreate,
    PromoCodeUpdate, RentalCreate,
};
use rust_decimal::Decimal;
use shared::models::{FeeCalculation, FeeCode, InventoryStatus, RentalStatus};
use shared::util::{MILLIS_PER_DAY, now_millis};

fn open_rental(customer_id: &str, location_id: &str, items: Vec<i64>) -> RentalCreate {
    RentalCreate {
        customer_id: customer_id.into(),
        location_id: location_id.into(),
        employee_id: None,
        inventory_item_ids: items,
        status: RentalStatus::Open,
        due_at: None,
    }
}

async fn item_status(
    service: &rental_store::DbService,
    location_id: &str,
    item_id: i64,
) -> InventoryStatus {
    service
        .locations()
        .find_by_id(location_id)
        .await
        .unwrap()
        .unwrap()
        .inventory_item(item_id)
        .unwrap()
        .status
}

#[tokio::test]
async fn test_rental_without_items_rejected() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, _) = stocked_store(&service, 1).await;

    let err = service
        .rentals()
        .create(open_rental(&id_of(&ava.id), &id_of(&store.id), vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = raw(
        &service,
        &format!(
            "CREATE rental CONTENT {{ customer: {}, location: {}, status: \"OPEN\", rented_at: 1, items: [] }}",
            id_of(&ava.id),
            id_of(&store.id)
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_paused_status_rejected() {
    let (_tmp, service) = setup().await;
    assert!("PAUSED".parse::<RentalStatus>().is_err());

    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, heat, items) = stocked_store(&service, 1).await;

    let err = raw(
        &service,
        &format!(
            "CREATE rental CONTENT {{ customer: {}, location: {}, status: \"PAUSED\", rented_at: 1, \
             items: [{{ inventory_item_id: {}, movie: {} }}] }}",
            id_of(&ava.id),
            id_of(&store.id),
            items[0].id,
            id_of(&heat.id)
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_create_marks_items_and_mirrors_customer() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let ava_id = id_of(&ava.id);
    let (store, heat, items) = stocked_store(&service, 2).await;
    let store_id = id_of(&store.id);

    let rental = service
        .rentals()
        .create(open_rental(&ava_id, &store_id, vec![items[0].id]))
        .await
        .unwrap();
    assert_eq!(rental.status, RentalStatus::Open);
    assert_eq!(rental.items[0].movie, heat.id.clone().unwrap());
    assert!(rental.reserved_at.is_none());

    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Rented);
    assert_eq!(item_status(&service, &store_id, items[1].id).await, InventoryStatus::Available);

    let customer = service.customers().find_by_id(&ava_id).await.unwrap().unwrap();
    let entry = customer.recent_rentals.newest().unwrap();
    assert_eq!(Some(entry.rental.clone()), rental.id);
    assert_eq!(entry.status, RentalStatus::Open);

    // The rented copy cannot go out twice
    let err = service
        .rentals()
        .create(open_rental(&ava_id, &store_id, vec![items[0].id]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let history = service.rentals().find_by_inventory_item(items[0].id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_create_checks_references() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let ava_id = id_of(&ava.id);
    let (store, _, items) = stocked_store(&service, 1).await;
    let store_id = id_of(&store.id);

    let err = service
        .rentals()
        .create(open_rental("customer:ghost", &store_id, vec![items[0].id]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Reference(_)));

    let err = service
        .rentals()
        .create(open_rental(&ava_id, "location:ghost", vec![items[0].id]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Reference(_)));

    let err = service
        .rentals()
        .create(open_rental(&ava_id, &store_id, vec![items[0].id + 1]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Reference(_)));

    let mut with_employee = open_rental(&ava_id, &store_id, vec![items[0].id]);
    with_employee.employee_id = Some(42);
    let err = service.rentals().create(with_employee).await.unwrap_err();
    assert!(matches!(err, RepoError::Reference(_)));

    let bo = service
        .locations()
        .add_employee(
            &store_id,
            EmployeeCreate {
                first_name: "Bo".into(),
                last_name: "Lund".into(),
                email: "bo@store.dk".into(),
                phone_number: None,
            },
        )
        .await
        .unwrap();
    let mut with_employee = open_rental(&ava_id, &store_id, vec![items[0].id]);
    with_employee.employee_id = Some(bo.id);
    let rental = service.rentals().create(with_employee).await.unwrap();
    assert_eq!(rental.employee, Some(bo.id));
}

#[tokio::test]
async fn test_reservation_lifecycle() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let ava_id = id_of(&ava.id);
    let (store, _, items) = stocked_store(&service, 1).await;
    let store_id = id_of(&store.id);
    let repo = service.rentals();

    let mut reserve = open_rental(&ava_id, &store_id, vec![items[0].id]);
    reserve.status = RentalStatus::Reserved;
    let rental = repo.create(reserve).await.unwrap();
    let rental_id = id_of(&rental.id);
    assert!(rental.reserved_at.is_some());
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Reserved);

    // RESERVED cannot jump straight to RETURNED
    let err = repo.transition(&rental_id, RentalStatus::Returned).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let open = repo.transition(&rental_id, RentalStatus::Open).await.unwrap();
    assert_eq!(open.status, RentalStatus::Open);
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Rented);

    let late = repo.transition(&rental_id, RentalStatus::Late).await.unwrap();
    assert_eq!(late.status, RentalStatus::Late);

    let returned = repo.transition(&rental_id, RentalStatus::Returned).await.unwrap();
    assert!(returned.returned_at.is_some());
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Available);

    // Returned rentals are history
    let err = repo.transition(&rental_id, RentalStatus::Open).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    let err = repo
        .add_payment(
            &rental_id,
            PaymentCreate {
                amount_dkk: Decimal::from(49),
                method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let customer = service.customers().find_by_id(&ava_id).await.unwrap().unwrap();
    assert_eq!(customer.recent_rentals.len(), 1);
    assert_eq!(
        customer.recent_rentals.newest().unwrap().status,
        RentalStatus::Returned
    );

    let returned_only = repo
        .find_by_customer(&ava_id, Some(RentalStatus::Returned))
        .await
        .unwrap();
    assert_eq!(returned_only.len(), 1);
    assert!(repo.find_by_status(RentalStatus::Open).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_releases_items() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    let store_id = id_of(&store.id);

    let mut reserve = open_rental(&id_of(&ava.id), &store_id, vec![items[0].id]);
    reserve.status = RentalStatus::Reserved;
    let rental = service.rentals().create(reserve).await.unwrap();

    let cancelled = service
        .rentals()
        .transition(&id_of(&rental.id), RentalStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, RentalStatus::Cancelled);
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Available);

    let err = service
        .rentals()
        .apply_promo(&id_of(&rental.id), "NOV25")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn test_sixth_rental_evicts_oldest_recent_entry() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let ava_id = id_of(&ava.id);
    let (store, _, items) = stocked_store(&service, 6).await;
    let store_id = id_of(&store.id);

    let mut rentals = Vec::new();
    for item in &items {
        let rental = service
            .rentals()
            .create(open_rental(&ava_id, &store_id, vec![item.id]))
            .await
            .unwrap();
        rentals.push(rental.id.unwrap());
    }

    let customer = service.customers().find_by_id(&ava_id).await.unwrap().unwrap();
    let cached: Vec<_> = customer.recent_rentals.iter().map(|e| e.rental.clone()).collect();
    assert_eq!(cached.len(), 5);
    assert!(!cached.contains(&rentals[0]));
    assert_eq!(cached, rentals[1..].to_vec());

    let all = service.rentals().find_by_customer(&ava_id, None).await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_promo_snapshot_survives_edit_and_deactivation() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    let promo = service
        .promo_codes()
        .create(PromoCodeCreate {
            code: "NOV25".into(),
            description: Some("November".into()),
            percent_off: Some(Decimal::from(25)),
            ..Default::default()
        })
        .await
        .unwrap();
    let promo_id = id_of(&promo.id);

    let rental = service
        .rentals()
        .create(open_rental(&id_of(&ava.id), &id_of(&store.id), vec![items[0].id]))
        .await
        .unwrap();
    let rental_id = id_of(&rental.id);

    let err = service
        .rentals()
        .apply_promo(&rental_id, "DEC10")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Reference(_)));

    let with_promo = service.rentals().apply_promo(&rental_id, "NOV25").await.unwrap();
    let applied = with_promo.promo.clone().unwrap();
    assert_eq!(applied.code, "NOV25");
    assert_eq!(applied.percent_off, Some(Decimal::from(25)));

    service
        .promo_codes()
        .update(
            &promo_id,
            PromoCodeUpdate {
                percent_off: Some(Some(Decimal::from(50))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    service.promo_codes().deactivate(&promo_id).await.unwrap();

    let stored = service.rentals().find_by_id(&rental_id).await.unwrap().unwrap();
    assert_eq!(stored.promo, Some(applied));

    // A second promo is refused
    let err = service
        .rentals()
        .apply_promo(&rental_id, "NOV25")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn test_inactive_or_expired_promo_rejected() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    let now = now_millis();
    service
        .promo_codes()
        .create(PromoCodeCreate {
            code: "OCT10".into(),
            amount_off_dkk: Some(Decimal::from(10)),
            starts_at: Some(now - 30 * MILLIS_PER_DAY),
            ends_at: Some(now - MILLIS_PER_DAY),
            ..Default::default()
        })
        .await
        .unwrap();
    service
        .promo_codes()
        .create(PromoCodeCreate {
            code: "OFF".into(),
            percent_off: Some(Decimal::from(5)),
            is_active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let rental = service
        .rentals()
        .create(open_rental(&id_of(&ava.id), &id_of(&store.id), vec![items[0].id]))
        .await
        .unwrap();
    let rental_id = id_of(&rental.id);

    for code in ["OCT10", "OFF"] {
        let err = service.rentals().apply_promo(&rental_id, code).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "{code}: {err:?}");
    }
}

#[tokio::test]
async fn test_payments_and_fees() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;

    let late = service
        .fee_types()
        .create(FeeTypeCreate {
            code: FeeCode::Late,
            description: None,
            calculation: FeeCalculation::PerDay,
            default_amount_dkk: Decimal::from(10),
            is_taxable: true,
        })
        .await
        .unwrap();
    service
        .fee_types()
        .create(FeeTypeCreate {
            code: FeeCode::Damaged,
            description: None,
            calculation: FeeCalculation::Percentage,
            default_amount_dkk: Decimal::from(50),
            is_taxable: false,
        })
        .await
        .unwrap();
    service
        .fee_types()
        .create(FeeTypeCreate {
            code: FeeCode::Other,
            description: None,
            calculation: FeeCalculation::Other,
            default_amount_dkk: Decimal::ZERO,
            is_taxable: false,
        })
        .await
        .unwrap();

    let mut data = open_rental(&id_of(&ava.id), &id_of(&store.id), vec![items[0].id]);
    // Due three days ago (plus a little), so the rental is 3 days overdue
    data.due_at = Some(now_millis() - 3 * MILLIS_PER_DAY + 60_000);
    let rental = service.rentals().create(data).await.unwrap();
    let rental_id = id_of(&rental.id);
    let repo = service.rentals();

    let err = repo
        .add_payment(
            &rental_id,
            PaymentCreate {
                amount_dkk: Decimal::ZERO,
                method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    repo.add_payment(
        &rental_id,
        PaymentCreate {
            amount_dkk: Decimal::from(40),
            method: Some("card".into()),
        },
    )
    .await
    .unwrap();

    let late_fee = repo
        .apply_fee(
            &rental_id,
            FeeCreate {
                code: FeeCode::Late,
                amount_dkk: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(late_fee.amount_dkk, Decimal::from(30));
    assert_eq!(late_fee.rule.calculation, FeeCalculation::PerDay);

    let damaged = repo
        .apply_fee(
            &rental_id,
            FeeCreate {
                code: FeeCode::Damaged,
                amount_dkk: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(damaged.amount_dkk, Decimal::from(20));

    let err = repo
        .apply_fee(
            &rental_id,
            FeeCreate {
                code: FeeCode::Other,
                amount_dkk: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    let other = repo
        .apply_fee(
            &rental_id,
            FeeCreate {
                code: FeeCode::Other,
                amount_dkk: Some(Decimal::from(15)),
            },
        )
        .await
        .unwrap();
    assert_eq!(other.amount_dkk, Decimal::from(15));

    // Editing the fee type leaves charged fees alone
    service
        .fee_types()
        .update(
            &id_of(&late.id),
            FeeTypeUpdate {
                default_amount_dkk: Some(Decimal::from(25)),
                calculation: Some(FeeCalculation::Flat),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = repo.find_by_id(&rental_id).await.unwrap().unwrap();
    assert_eq!(stored.payments.len(), 1);
    assert_eq!(stored.total_paid(), Decimal::from(40));
    assert_eq!(stored.fees.len(), 3);
    assert_eq!(stored.total_fees(), Decimal::from(65));
    let stored_late = stored.fees.iter().find(|f| f.fee_type == FeeCode::Late).unwrap();
    assert_eq!(stored_late.rule.calculation, FeeCalculation::PerDay);
    assert_eq!(stored_late.rule.default_amount_dkk, Decimal::from(10));
}

#[tokio::test]
async fn test_applied_amount_promo_reads_back() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    service
        .promo_codes()
        .create(PromoCodeCreate {
            code: "DKK40".into(),
            amount_off_dkk: Some(Decimal::new(4050, 2)),
            ..Default::default()
        })
        .await
        .unwrap();

    let rental = service
        .rentals()
        .create(open_rental(&id_of(&ava.id), &id_of(&store.id), vec![items[0].id]))
        .await
        .unwrap();
    let rental_id = id_of(&rental.id);
    service.rentals().apply_promo(&rental_id, "DKK40").await.unwrap();

    let stored = service.rentals().find_by_id(&rental_id).await.unwrap().unwrap();
    let promo = stored.promo.unwrap();
    assert_eq!(promo.percent_off, None);
    assert_eq!(promo.amount_off_dkk, Some(Decimal::new(4050, 2)));
    assert_eq!(promo.discount_on(Decimal::from(100)), Decimal::new(4050, 2));

    let listed = service
        .rentals()
        .find_by_customer(&id_of(&ava.id), None)
        .await
        .unwrap();
    assert_eq!(listed[0].promo.as_ref().unwrap().code, "DKK40");
}

#[tokio::test]
async fn test_failed_create_leaves_no_trace() {
    let tmp = tempfile::tempdir().unwrap();
    let service = rental_store::DbService::connect(tmp.path(), "test", "test")
        .await
        .unwrap();
    // Written before the schema existed; the current schema refuses a blank name
    service
        .db
        .query(
            "CREATE customer:blank CONTENT { first_name: '  ', last_name: 'Holm', \
             email: 'blank@x.dk', email_key: 'blank@x.dk', created_at: 1 }",
        )
        .await
        .unwrap()
        .check()
        .unwrap();
    service.prepare().await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    let store_id = id_of(&store.id);

    let err = service
        .rentals()
        .create(open_rental("customer:blank", &store_id, vec![items[0].id]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");

    assert!(
        service
            .rentals()
            .find_by_inventory_item(items[0].id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Available);
}

#[tokio::test]
async fn test_concurrent_creates_book_a_copy_once() {
    let (_tmp, service) = setup().await;
    let ava = service.customers().create(customer("ava@x.dk")).await.unwrap();
    let bo = service.customers().create(customer("bo@x.dk")).await.unwrap();
    let (store, _, items) = stocked_store(&service, 1).await;
    let store_id = id_of(&store.id);
    let repo = service.rentals();

    let (first, second) = tokio::join!(
        repo.create(open_rental(&id_of(&ava.id), &store_id, vec![items[0].id])),
        repo.create(open_rental(&id_of(&bo.id), &store_id, vec![items[0].id])),
    );
    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "first: {first:?}, second: {second:?}"
    );

    let history = repo.find_by_inventory_item(items[0].id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(item_status(&service, &store_id, items[0].id).await, InventoryStatus::Rented);
}
