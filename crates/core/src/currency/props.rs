//! Property-based tests for the rate graph.
//!
//! - Self rate seed: every new currency converts to itself at parity
//! - Inverse law: after set(a, b, r), a->b yields r and b->a yields 1/r
//! - Delete leaves no dangling edge

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::CurrencyService;
use crate::store::memory::MemoryCurrencyStore;

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate currency symbols.
fn symbol() -> impl Strategy<Value = String> {
    "[A-Z]{3}"
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any symbol, a freshly created currency holds exactly `s -> 1`.
    #[test]
    fn prop_create_seeds_self_rate(s in symbol()) {
        let found = block_on(async {
            let service = CurrencyService::new(Arc::new(MemoryCurrencyStore::new()));
            service.create_currency(&s, "Name").await.unwrap();
            service.find_currency_by_symbol(&s).await.unwrap()
        });

        let currency = found.expect("created currency is found");
        prop_assert_eq!(currency.rate_to(&s), Some(Decimal::ONE));
        prop_assert_eq!(currency.rates.len(), 1);
    }

    /// For any pair a != b and rate r > 0, the round trip obeys the inverse law.
    #[test]
    fn prop_rate_inverse_law(a in symbol(), b in symbol(), rate in positive_rate()) {
        prop_assume!(a != b);

        let (forward, backward) = block_on(async {
            let service = CurrencyService::new(Arc::new(MemoryCurrencyStore::new()));
            service.create_currency(&a, "A").await.unwrap();
            service.create_currency(&b, "B").await.unwrap();
            service.set_exchange_rate(&a, &b, rate).await.unwrap();
            (
                service.convert_currency(&a, &b, Decimal::ONE).await.unwrap(),
                service.convert_currency(&b, &a, Decimal::ONE).await.unwrap(),
            )
        });

        prop_assert_eq!(forward.converted_amount, rate);
        prop_assert_eq!(backward.converted_amount, Decimal::ONE / rate);
    }

    /// Same-symbol conversion is the identity for any amount.
    #[test]
    fn prop_same_symbol_identity(s in symbol(), cents in -1_000_000_000i64..1_000_000_000i64) {
        let amount = Decimal::new(cents, 2);
        let result = block_on(async {
            let service = CurrencyService::new(Arc::new(MemoryCurrencyStore::new()));
            service.convert_currency(&s, &s, amount).await.unwrap()
        });

        prop_assert_eq!(result.converted_amount, amount);
        prop_assert_eq!(result.exchange_rate, Decimal::ONE);
    }

    /// Deleting any currency leaves no edge pointing at it.
    #[test]
    fn prop_delete_leaves_no_dangling_edges(
        symbols in prop::collection::hash_set(symbol(), 2..6),
        rate in positive_rate(),
    ) {
        let symbols: Vec<String> = symbols.into_iter().collect();
        let victim = symbols[0].clone();

        let remaining = block_on(async {
            let service = CurrencyService::new(Arc::new(MemoryCurrencyStore::new()));
            for s in &symbols {
                service.create_currency(s, s).await.unwrap();
            }
            for s in &symbols[1..] {
                service.set_exchange_rate(s, &victim, rate).await.unwrap();
            }
            service.delete_currency(&victim).await.unwrap();
            service.get_all_currencies().await.unwrap()
        });

        prop_assert_eq!(remaining.len(), symbols.len() - 1);
        for currency in remaining {
            prop_assert!(!currency.rates.contains_key(&victim));
        }
    }
}
