//! Pagination and count properties over random collections.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use strata_store::{InMemoryKv, KvStorage, Storage};
use strata_types::{OrderDirection, Storable, StorageListOptions, StorageQuery};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Row {
    id: String,
    score: i64,
    group: String,
}

impl Storable for Row {
    const KIND: &'static str = "row";

    fn id(&self) -> &str {
        &self.id
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((-20i64..20, "[ab]"), 0..30).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (score, group))| Row {
                id: format!("r{i:03}"),
                score,
                group,
            })
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = Option<StorageQuery>> {
    prop_oneof![
        Just(None),
        (-20i64..20).prop_map(|n| Some(StorageQuery::gte("score", n))),
        "[abc]".prop_map(|g| Some(StorageQuery::eq("group", g))),
        Just(Some(StorageQuery::Or(vec![]))),
    ]
}

fn arb_order() -> impl Strategy<Value = Option<OrderDirection>> {
    prop_oneof![
        Just(None),
        Just(Some(OrderDirection::Asc)),
        Just(Some(OrderDirection::Desc)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn page_is_a_slice_of_the_full_listing(
        rows in arb_rows(),
        query in arb_query(),
        order in arb_order(),
        offset in 0usize..35,
        limit in prop::option::of(0usize..35),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let storage = KvStorage::new(InMemoryKv::new());
            for row in &rows {
                storage.save(row).await.unwrap();
            }

            let mut base = StorageListOptions::new();
            base.query = query.clone();
            if let Some(direction) = order {
                base = base.order_by("score", direction);
            }

            let full = storage.list::<Row>(base.clone()).await.unwrap();
            prop_assert_eq!(full.total, full.items.len());

            let mut paged_options = base.offset(offset);
            paged_options.limit = limit;
            let page = storage.list::<Row>(paged_options).await.unwrap();

            let start = offset.min(full.items.len());
            let end = limit.map_or(full.items.len(), |l| (start + l).min(full.items.len()));
            prop_assert_eq!(&page.items[..], &full.items[start..end]);
            prop_assert_eq!(page.total, full.items.len());
            prop_assert_eq!(page.offset, offset);

            let count = storage.count::<Row>(query).await.unwrap();
            prop_assert_eq!(count, full.items.len());

            if order == Some(OrderDirection::Desc) {
                for pair in full.items.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                    if pair[0].score == pair[1].score {
                        // Ties keep key order.
                        prop_assert!(pair[0].id < pair[1].id);
                    }
                }
            }
            Ok(())
        })?;
    }
}
