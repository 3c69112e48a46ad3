//! End-to-end tests for promotional pricing.
//!
//! Exercises `PricingService` over in-memory sources: the documented pricing
//! scenarios, the floor/ordering/exclusivity/metadata properties, and the
//! symmetry between the product-variant and search-result paths.

use std::collections::HashSet;

use bramble_core::{
    ChannelId, CollectionId, CustomerGroupId, LanguageCode, OrderId, ProductId, PromotionId,
    UserId,
};
use bramble_integration_tests::fakes::{
    FakeCustomerGroups, FakeOrders, FakePromotions, FakeProducts,
};
use bramble_promotions::context::{OrderTotals, RequestContext};
use bramble_promotions::error::EvaluationError;
use bramble_promotions::pricing::{PricingService, SearchResultPrice};
use bramble_promotions::sources::ProductDiscountProfile;
use bramble_promotions::types::{
    ConfigArg, Promotion, PromotionAction, PromotionCondition, PromotionTranslation,
};

type Service = PricingService<FakePromotions, FakeCustomerGroups, FakeOrders, FakeProducts>;

// =============================================================================
// Builders
// =============================================================================

fn args(pairs: &[(&str, &str)]) -> Vec<ConfigArg> {
    pairs
        .iter()
        .map(|(name, value)| ConfigArg {
            name: (*name).to_string(),
            value: (*value).to_string(),
        })
        .collect()
}

fn promotion(
    id: i64,
    priority_score: i32,
    conditions: Vec<(&str, Vec<ConfigArg>)>,
    actions: Vec<(&str, Vec<ConfigArg>)>,
) -> Promotion {
    Promotion {
        id: PromotionId::new(id),
        enabled: true,
        starts_at: None,
        ends_at: None,
        deleted_at: None,
        priority_score,
        conditions: conditions
            .into_iter()
            .map(|(code, args)| PromotionCondition {
                code: code.to_string(),
                args,
            })
            .collect(),
        actions: actions
            .into_iter()
            .map(|(code, args)| PromotionAction {
                code: code.to_string(),
                args,
            })
            .collect(),
        translations: vec![PromotionTranslation {
            language: LanguageCode::en(),
            name: format!("Promotion {id}"),
            description: format!("Description {id}"),
        }],
    }
}

fn request() -> RequestContext {
    RequestContext {
        active_user_id: Some(UserId::new(1)),
        active_order_id: None,
        channel_id: ChannelId::new(1),
        language: LanguageCode::en(),
    }
}

fn service(promotions: Vec<Promotion>) -> Service {
    PricingService::new(
        FakePromotions {
            promotions,
            fail: false,
        },
        FakeCustomerGroups::default(),
        FakeOrders::default(),
        FakeProducts::default(),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario A: one active all_products promotion with a fixed 10.00 discount.
#[tokio::test]
async fn test_fixed_discount_applies() {
    bramble_integration_tests::init_tracing();
    let svc = service(vec![promotion(
        1,
        99,
        vec![("all_products", vec![])],
        vec![(
            "line_fixed_discount",
            args(&[("discount", "10"), ("minThreshold", "0")]),
        )],
    )]);

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.value, 9_000);
    assert_eq!(result.metadata.len(), 1);
    let line = result.metadata.first().unwrap();
    assert_eq!(line.price, 1_000);
    assert_eq!(line.name, "Promotion 1");
    assert_eq!(line.description, "Description 1");
    assert!(!line.is_customer_group);
}

/// Scenario B: an unrelated customer-group promotion suppresses general
/// promotions for the whole request.
#[tokio::test]
async fn test_group_membership_suppresses_general_promotions() {
    let promotions = vec![
        promotion(
            1,
            99,
            vec![("all_products", vec![])],
            vec![("line_fixed_discount", args(&[("discount", "10")]))],
        ),
        promotion(
            2,
            10,
            vec![("customer_group", args(&[("customerGroupId", "4")]))],
            vec![("line_percentage_discount", args(&[("discount", "5")]))],
        ),
    ];
    let svc = PricingService::new(
        FakePromotions {
            promotions,
            fail: false,
        },
        FakeCustomerGroups {
            groups: HashSet::from([CustomerGroupId::new(4)]),
        },
        FakeOrders::default(),
        FakeProducts::default(),
    );

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    // Only the group-targeted promotion applied
    assert_eq!(result.value, 9_500);
    assert_eq!(result.metadata.len(), 1);
    assert!(result.metadata.first().unwrap().is_customer_group);
}

/// Scenario C: a full-price-only action is skipped once an earlier discount
/// moved the accumulator.
#[tokio::test]
async fn test_full_price_action_skipped_after_prior_discount() {
    let svc = service(vec![
        promotion(
            1,
            1,
            vec![("all_products", vec![])],
            vec![("line_fixed_discount", args(&[("discount", "1")]))],
        ),
        promotion(
            2,
            2,
            vec![("all_products", vec![])],
            vec![(
                "line_percentage_discount_full_price",
                args(&[("discount", "50")]),
            )],
        ),
    ]);

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 500)
        .await
        .unwrap()
        .unwrap();

    // Only the first promotion's 1.00 discount applied
    assert_eq!(result.value, 400);
    assert_eq!(result.metadata.len(), 1);
    assert_eq!(result.metadata.first().unwrap().price, 100);
}

/// Scenario D: no active promotions for the channel resolves to None, not a
/// zero-discount result.
#[tokio::test]
async fn test_no_active_promotions_is_none() {
    let svc = service(vec![]);

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap();

    assert!(result.is_none());
}

/// Scenario E: collection-scoped percentage discount for a member product.
#[tokio::test]
async fn test_collection_scoped_percentage() {
    let promotions = vec![promotion(
        1,
        50,
        vec![("all_products", vec![])],
        vec![(
            "all_collections",
            args(&[("discount", "20"), ("collectionsID", r#"[{"id":"5"}]"#)]),
        )],
    )];
    let svc = PricingService::new(
        FakePromotions {
            promotions,
            fail: false,
        },
        FakeCustomerGroups::default(),
        FakeOrders::default(),
        FakeProducts {
            profile: ProductDiscountProfile {
                discount_by: 0,
                collections: HashSet::from([CollectionId::new(5)]),
            },
        },
    );

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.value, 8_000);
    assert_eq!(result.metadata.first().unwrap().price, 2_000);
}

// =============================================================================
// Properties
// =============================================================================

/// P1: the effective price never drops below one minor unit.
#[tokio::test]
async fn test_value_never_below_one() {
    let svc = service(vec![promotion(
        1,
        0,
        vec![("all_products", vec![])],
        vec![("line_fixed_discount", args(&[("discount", "9999")]))],
    )]);

    for base in [1, 2, 100, 999_999] {
        let result = svc
            .variant_discounted_price(&request(), ProductId::new(1), base)
            .await
            .unwrap()
            .unwrap();
        assert!(result.value >= 1, "base {base} produced {}", result.value);
    }
}

/// P2: the variant path and the search-result path produce identical results
/// for identical inputs, including when the search price is a range.
#[tokio::test]
async fn test_variant_and_search_paths_agree() {
    let svc = service(vec![
        promotion(
            1,
            10,
            vec![("all_products", vec![])],
            vec![("line_percentage_discount", args(&[("discount", "15")]))],
        ),
        promotion(
            2,
            20,
            vec![("all_products", vec![])],
            vec![("line_fixed_discount", args(&[("discount", "2")]))],
        ),
    ]);

    let via_variant = svc
        .variant_discounted_price(&request(), ProductId::new(1), 3_333)
        .await
        .unwrap();
    let via_search = svc
        .search_result_discounted_price(&request(), ProductId::new(1), SearchResultPrice::Value(3_333))
        .await
        .unwrap();
    let via_range = svc
        .search_result_discounted_price(
            &request(),
            ProductId::new(1),
            SearchResultPrice::Range {
                min: 3_333,
                max: 9_999,
            },
        )
        .await
        .unwrap();

    assert_eq!(via_variant, via_search);
    assert_eq!(via_variant, via_range);
}

/// P3: promotions fold in ascending priority score regardless of fetch order.
#[tokio::test]
async fn test_priority_score_ordering() {
    let first = promotion(
        1,
        20,
        vec![("all_products", vec![])],
        vec![("line_fixed_discount", args(&[("discount", "1")]))],
    );
    let second = promotion(
        2,
        10,
        vec![("all_products", vec![])],
        vec![("line_fixed_discount_full_price", args(&[("discount", "2")]))],
    );

    let forward = service(vec![first.clone(), second.clone()]);
    let reversed = service(vec![second, first]);

    let a = forward
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();
    let b = reversed
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    // Promotion 2 (score 10) always runs first on the full price
    assert_eq!(a.value, 9_700);
    assert_eq!(a.value, b.value);
}

/// P4: group membership suppresses all_products, minimum_order_amount, and
/// all_collections across the request.
#[tokio::test]
async fn test_exclusivity_suppresses_all_general_forms() {
    let promotions = vec![
        promotion(
            1,
            1,
            vec![("all_products", vec![])],
            vec![("line_fixed_discount", args(&[("discount", "1")]))],
        ),
        promotion(
            2,
            2,
            vec![("minimum_order_amount", args(&[("amount", "1")]))],
            vec![("line_fixed_discount", args(&[("discount", "1")]))],
        ),
        promotion(
            3,
            3,
            vec![("all_products", vec![])],
            vec![(
                "all_collections",
                args(&[("discount", "20"), ("collectionsID", r#"[{"id":"5"}]"#)]),
            )],
        ),
        promotion(
            4,
            4,
            vec![("customer_group", args(&[("customerGroupId", "9")]))],
            vec![("line_fixed_discount", args(&[("discount", "3")]))],
        ),
    ];
    let svc = PricingService::new(
        FakePromotions {
            promotions,
            fail: false,
        },
        FakeCustomerGroups {
            groups: HashSet::from([CustomerGroupId::new(9)]),
        },
        FakeOrders {
            totals: Some(OrderTotals {
                sub_total: 100_000,
                sub_total_with_tax: 120_000,
            }),
        },
        FakeProducts {
            profile: ProductDiscountProfile {
                discount_by: 0,
                collections: HashSet::from([CollectionId::new(5)]),
            },
        },
    );

    let mut req = request();
    req.active_order_id = Some(OrderId::new(1));

    let result = svc
        .variant_discounted_price(&req, ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    // Only promotion 4 (the group promotion) applied: 10000 - 300
    assert_eq!(result.value, 9_700);
    assert_eq!(result.metadata.len(), 1);
    assert!(result.metadata.first().unwrap().is_customer_group);
}

/// P5: unknown action codes leave the accumulator unchanged.
#[tokio::test]
async fn test_unknown_actions_are_noops() {
    let svc = service(vec![promotion(
        1,
        0,
        vec![("all_products", vec![])],
        vec![
            ("free_shipping", vec![]),
            ("buy_x_get_y", args(&[("discount", "50")])),
        ],
    )]);

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.value, 10_000);
    assert!(result.metadata.is_empty());
}

/// P6: metadata never carries zero-price entries.
#[tokio::test]
async fn test_no_zero_price_metadata() {
    let svc = service(vec![
        promotion(
            1,
            1,
            vec![("all_products", vec![])],
            // Threshold never met: qualifies but contributes nothing
            vec![(
                "line_fixed_discount",
                args(&[("discount", "10"), ("minThreshold", "9999")]),
            )],
        ),
        promotion(
            2,
            2,
            vec![("all_products", vec![])],
            vec![("line_fixed_discount", args(&[("discount", "5")]))],
        ),
    ]);

    let result = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.value, 9_500);
    assert!(result.metadata.iter().all(|line| line.price != 0));
    assert_eq!(result.metadata.len(), 1);
}

// =============================================================================
// Error handling
// =============================================================================

/// Both exposure points surface upstream failures as typed errors; neither
/// swallows them.
#[tokio::test]
async fn test_upstream_failure_surfaces_identically() {
    bramble_integration_tests::init_tracing();
    let svc = PricingService::new(
        FakePromotions {
            promotions: vec![],
            fail: true,
        },
        FakeCustomerGroups::default(),
        FakeOrders::default(),
        FakeProducts::default(),
    );

    let via_variant = svc
        .variant_discounted_price(&request(), ProductId::new(1), 10_000)
        .await;
    let via_search = svc
        .search_result_discounted_price(&request(), ProductId::new(1), SearchResultPrice::Value(10_000))
        .await;

    assert!(matches!(via_variant, Err(EvaluationError::Repository(_))));
    assert!(matches!(via_search, Err(EvaluationError::Repository(_))));
}

/// Guests (no user, no order) still price correctly against general
/// promotions.
#[tokio::test]
async fn test_guest_request_prices_general_promotions() {
    let svc = service(vec![promotion(
        1,
        99,
        vec![("all_products", vec![])],
        vec![("line_percentage_discount", args(&[("discount", "10")]))],
    )]);

    let req = RequestContext {
        active_user_id: None,
        active_order_id: None,
        channel_id: ChannelId::new(1),
        language: LanguageCode::en(),
    };

    let result = svc
        .variant_discounted_price(&req, ProductId::new(1), 5_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.value, 4_500);
}
