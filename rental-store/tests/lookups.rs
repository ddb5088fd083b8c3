mod common;

use common::{id_of, setup};
use rental_store::RepoError;
use rental_store::db::models::{
    FeeTypeCreate, FeeTypeUpdate, MembershipTypeCreate, MembershipTypeUpdate, PromoCodeCreate,
    PromoCodeUpdate,
};
use rust_decimal::Decimal;
use shared::models::{FeeCalculation, FeeCode, MembershipCode};

fn nov25() -> PromoCodeCreate {
    PromoCodeCreate {
        code: "NOV25".into(),
        description: Some("November".into()),
        percent_off: Some(Decimal::from(25)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_duplicate_lookup_codes_conflict() {
    let (_tmp, service) = setup().await;

    let gold = MembershipTypeCreate {
        code: MembershipCode::Gold,
        description: None,
        monthly_cost_dkk: Decimal::from(149),
        benefits: vec![],
    };
    service.membership_types().create(gold.clone()).await.unwrap();
    assert!(matches!(
        service.membership_types().create(gold).await.unwrap_err(),
        RepoError::Duplicate(_)
    ));

    let late = FeeTypeCreate {
        code: FeeCode::Late,
        description: None,
        calculation: FeeCalculation::PerDay,
        default_amount_dkk: Decimal::from(10),
        is_taxable: true,
    };
    service.fee_types().create(late.clone()).await.unwrap();
    assert!(matches!(
        service.fee_types().create(late).await.unwrap_err(),
        RepoError::Duplicate(_)
    ));

    service.promo_codes().create(nov25()).await.unwrap();
    assert!(matches!(
        service.promo_codes().create(nov25()).await.unwrap_err(),
        RepoError::Duplicate(_)
    ));
}

#[tokio::test]
async fn test_find_lookups_by_code() {
    let (_tmp, service) = setup().await;
    for code in MembershipCode::ALL {
        service
            .membership_types()
            .create(MembershipTypeCreate {
                code,
                description: None,
                monthly_cost_dkk: Decimal::from(50),
                benefits: vec![],
            })
            .await
            .unwrap();
    }

    let all = service.membership_types().find_all().await.unwrap();
    assert_eq!(all.len(), 3);
    let bronze = service
        .membership_types()
        .find_by_code(MembershipCode::Bronze)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bronze.code, MembershipCode::Bronze);
    assert!(bronze.is_active);

    assert!(
        service
            .fee_types()
            .find_by_code(FeeCode::Damaged)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_fee_type_update_and_delete() {
    let (_tmp, service) = setup().await;
    let repo = service.fee_types();
    let damaged = repo
        .create(FeeTypeCreate {
            code: FeeCode::Damaged,
            description: Some("Damaged disc".into()),
            calculation: FeeCalculation::Flat,
            default_amount_dkk: Decimal::from(150),
            is_taxable: true,
        })
        .await
        .unwrap();
    let damaged_id = id_of(&damaged.id);

    let err = repo
        .update(
            &damaged_id,
            FeeTypeUpdate {
                default_amount_dkk: Some(Decimal::from(-1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let updated = repo
        .update(
            &damaged_id,
            FeeTypeUpdate {
                calculation: Some(FeeCalculation::Percentage),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.calculation, FeeCalculation::Percentage);
    assert_eq!(updated.default_amount_dkk, Decimal::from(150));

    assert!(repo.delete(&damaged_id).await.unwrap());
    assert!(repo.find_by_id(&damaged_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_promo_validation_and_deactivate() {
    let (_tmp, service) = setup().await;
    let repo = service.promo_codes();

    let err = repo
        .create(PromoCodeCreate {
            percent_off: Some(Decimal::from(120)),
            ..nov25()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo
        .create(PromoCodeCreate {
            amount_off_dkk: Some(Decimal::from(-5)),
            ..nov25()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Percentage and fixed amount may be combined
    let promo = repo
        .create(PromoCodeCreate {
            amount_off_dkk: Some(Decimal::from(10)),
            ..nov25()
        })
        .await
        .unwrap();
    assert!(promo.is_active);
    let promo_id = id_of(&promo.id);

    let err = repo
        .update(
            &promo_id,
            PromoCodeUpdate {
                starts_at: Some(Some(2_000)),
                ends_at: Some(Some(1_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let off = repo.deactivate(&promo_id).await.unwrap();
    assert!(!off.is_active);
    assert!(!off.is_valid_at(shared::util::now_millis()));

    let found = repo.find_by_code("NOV25").await.unwrap().unwrap();
    assert!(!found.is_active);
}

#[tokio::test]
async fn test_promo_discounts_read_back() {
    let (_tmp, service) = setup().await;
    let repo = service.promo_codes();

    let percent = repo.create(nov25()).await.unwrap();
    assert_eq!(percent.percent_off, Some(Decimal::from(25)));
    assert_eq!(percent.amount_off_dkk, None);

    let amount = repo
        .create(PromoCodeCreate {
            code: "DKK40".into(),
            amount_off_dkk: Some(Decimal::new(4050, 2)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(amount.percent_off, None);
    assert_eq!(amount.amount_off_dkk, Some(Decimal::new(4050, 2)));

    let found = repo.find_by_code("NOV25").await.unwrap().unwrap();
    assert_eq!(found.percent_off, Some(Decimal::from(25)));
    let found = repo.find_by_id(&id_of(&amount.id)).await.unwrap().unwrap();
    assert_eq!(found.amount_off_dkk, Some(Decimal::new(4050, 2)));
    assert_eq!(repo.find_all().await.unwrap().len(), 2);

    // Swap the percentage for a fixed amount and drop the end date
    let swapped = repo
        .update(
            &id_of(&percent.id),
            PromoCodeUpdate {
                percent_off: Some(None),
                amount_off_dkk: Some(Some(Decimal::from(15))),
                ends_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(swapped.percent_off, None);
    assert_eq!(swapped.amount_off_dkk, Some(Decimal::from(15)));
    assert_eq!(swapped.ends_at, None);

    let stored = repo.find_by_code("NOV25").await.unwrap().unwrap();
    assert_eq!(stored.percent_off, None);
    assert_eq!(stored.amount_off_dkk, Some(Decimal::from(15)));
}

#[tokio::test]
async fn test_lookup_decimal_updates_read_back() {
    let (_tmp, service) = setup().await;

    let gold = service
        .membership_types()
        .create(MembershipTypeCreate {
            code: MembershipCode::Gold,
            description: None,
            monthly_cost_dkk: Decimal::new(14950, 2),
            benefits: vec!["Free popcorn".into()],
        })
        .await
        .unwrap();
    let gold = service
        .membership_types()
        .update(
            &id_of(&gold.id),
            MembershipTypeUpdate {
                monthly_cost_dkk: Some(Decimal::new(9950, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(gold.monthly_cost_dkk, Decimal::new(9950, 2));

    let late = service
        .fee_types()
        .create(FeeTypeCreate {
            code: FeeCode::Late,
            description: None,
            calculation: FeeCalculation::PerDay,
            default_amount_dkk: Decimal::new(1250, 2),
            is_taxable: true,
        })
        .await
        .unwrap();
    assert_eq!(late.default_amount_dkk, Decimal::new(1250, 2));
    let stored = service
        .fee_types()
        .find_by_code(FeeCode::Late)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.default_amount_dkk, Decimal::new(1250, 2));
}
