use engine::{Currency, FeeQuoter, Money};

mod support;

use support::FakeApi;

#[tokio::test]
async fn quote_is_reused_while_the_key_is_unchanged() {
    let api = FakeApi::new();
    api.set_fee(Money::new(150));
    let mut quoter = FeeQuoter::new();

    let fee = quoter.quote(&api, Money::new(10_000), Currency::EUR, "w1").await;
    assert_eq!(fee, Some(Money::new(150)));
    let again = quoter.quote(&api, Money::new(10_000), Currency::EUR, "w1").await;
    assert_eq!(again, Some(Money::new(150)));
    assert_eq!(api.count("calculate_transaction_fee"), 1);

    quoter.quote(&api, Money::new(10_000), Currency::EUR, "w2").await;
    quoter.quote(&api, Money::new(20_000), Currency::EUR, "w2").await;
    assert_eq!(api.count("calculate_transaction_fee"), 3);
    assert_eq!(quoter.last_quote(), Some(Money::new(150)));
}

#[tokio::test]
async fn failed_quote_yields_nothing_and_is_retried() {
    let api = FakeApi::new();
    api.set_fee(Money::new(99));
    api.fail_next("calculate_transaction_fee", "fee service down");
    let mut quoter = FeeQuoter::new();

    assert_eq!(quoter.quote(&api, Money::new(500), Currency::USD, "w1").await, None);
    assert_eq!(quoter.last_quote(), None);

    assert_eq!(
        quoter.quote(&api, Money::new(500), Currency::USD, "w1").await,
        Some(Money::new(99))
    );
    assert_eq!(api.count("calculate_transaction_fee"), 2);
}

#[tokio::test]
async fn zero_amount_is_not_quoted() {
    let api = FakeApi::new();
    let mut quoter = FeeQuoter::new();

    assert_eq!(quoter.quote(&api, Money::ZERO, Currency::EUR, "w1").await, None);
    assert!(api.calls().is_empty());
}
