//! Catalog join tests: asset resolution, per-stream scans, result shape.

use std::sync::Arc;

use hearth_core::{Asset, Category, Stream};
use hearth_query::{
    Catalog, CatalogError, CatalogResult, InMemoryCatalog, QueryError, Reading, Resolver,
};
use hearth_state::Store;

fn asset(id: &str, location: &str, category: Category) -> Asset {
    Asset {
        id: id.to_string(),
        name: format!("{id} device"),
        location: location.to_string(),
        asset_type: "thermostat".to_string(),
        class: "automation".to_string(),
        parent_id: None,
        category,
    }
}

fn stream(id: &str, asset_id: &str, category: Option<Category>) -> Stream {
    Stream {
        id: id.to_string(),
        name: format!("{id} stream"),
        asset_id: asset_id.to_string(),
        unit_of_measure: "F".to_string(),
        category,
    }
}

fn test_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![
            asset("NT01", "Living Room", Category::Utilization),
            asset("LB01", "Kitchen", Category::Alarm),
            asset("NT02", "Kitchen", Category::Utilization),
        ],
        vec![
            stream("NT01.T02", "NT01", Some(Category::Utilization)),
            stream("NT01.O01", "NT01", Some(Category::Alarm)),
            stream("LB01.O01", "LB01", None),
            stream("NT02.T01", "NT02", None),
        ],
    )
}

fn test_store() -> Store {
    let store = Store::open_in_memory(&Category::ALL).unwrap();
    store
        .put_batch(
            Category::Utilization,
            [
                ("NT01T0220250725T112658Z", "74"),
                ("NT01T0220250725T103258Z", "75"),
                ("NT01T0220250725T120000Z", "73.5"),
                ("NT02T0120250725T080000Z", "64"),
            ],
        )
        .unwrap();
    store
        .put(Category::Alarm, "LB01O0120250725T134509Z", "1")
        .unwrap();
    store
}

fn resolver() -> Resolver {
    Resolver::new(test_store(), Arc::new(test_catalog()))
}

#[tokio::test]
async fn two_streams_one_without_values() {
    let result = resolver().resolve(Some("NT01"), None).await.unwrap().unwrap();

    assert_eq!(result.asset.id, "NT01");
    assert_eq!(result.category.name, Category::Utilization);
    assert_eq!(result.category.streams.len(), 2);

    let temps = &result.category.streams[0];
    assert_eq!(temps.stream.id, "NT01.T02");
    assert_eq!(temps.category, Category::Utilization);
    let labels: Vec<&str> = temps.values.iter().map(|v| v.timestamp.as_str()).collect();
    assert_eq!(
        labels,
        vec!["20250725T103258Z", "20250725T112658Z", "20250725T120000Z"]
    );
    assert_eq!(temps.values[2].reading, Reading::Number(73.5));

    let alarms = &result.category.streams[1];
    assert_eq!(alarms.stream.id, "NT01.O01");
    assert_eq!(alarms.category, Category::Alarm);
    assert!(alarms.values.is_empty());
}

#[tokio::test]
async fn location_mismatch_resolves_to_none() {
    let result = resolver().resolve(Some("NT01"), Some("Kitchen")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn location_match_is_case_insensitive() {
    let result = resolver()
        .resolve(Some("nt01"), Some("living room"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.asset.id, "NT01");
    assert_eq!(result.category.streams[0].values.len(), 3);
}

#[tokio::test]
async fn location_only_picks_first_asset_there() {
    let result = resolver().resolve(None, Some("Kitchen")).await.unwrap().unwrap();
    assert_eq!(result.asset.id, "LB01");

    let bulb = &result.category.streams[0];
    assert_eq!(bulb.category, Category::Alarm);
    assert_eq!(bulb.values.len(), 1);
    assert_eq!(bulb.values[0].reading, Reading::State(true));
}

#[tokio::test]
async fn no_filters_picks_first_asset() {
    let result = resolver().resolve(None, None).await.unwrap().unwrap();
    assert_eq!(result.asset.id, "NT01");

    let blank = resolver().resolve(Some(""), Some("  ")).await.unwrap().unwrap();
    assert_eq!(blank.asset.id, "NT01");
}

#[tokio::test]
async fn unknown_asset_resolves_to_none() {
    assert!(resolver().resolve(Some("XX99"), None).await.unwrap().is_none());
    assert!(resolver().resolve(None, Some("Garage")).await.unwrap().is_none());
}

#[tokio::test]
async fn streams_without_data_or_local_id_are_kept_empty() {
    let catalog = InMemoryCatalog::new(
        vec![asset("NT01", "Living Room", Category::Utilization)],
        vec![
            stream("NT01T02", "NT01", None),
            stream("NT01.X99", "NT01", None),
            stream("NT01.T02", "NT01", None),
        ],
    );
    let resolver = Resolver::new(test_store(), Arc::new(catalog));
    let result = resolver.resolve(Some("NT01"), None).await.unwrap().unwrap();

    let counts: Vec<usize> = result
        .category
        .streams
        .iter()
        .map(|s| s.values.len())
        .collect();
    assert_eq!(counts, vec![0, 0, 3]);
}

#[tokio::test]
async fn unopened_namespace_yields_empty_stream() {
    let store = Store::open_in_memory(&[Category::Utilization]).unwrap();
    store
        .put(Category::Utilization, "NT01T0220250725T103258Z", "75")
        .unwrap();
    let resolver = Resolver::new(store, Arc::new(test_catalog()));

    let result = resolver.resolve(Some("NT01"), None).await.unwrap().unwrap();
    assert_eq!(result.category.streams[0].values.len(), 1);
    assert!(result.category.streams[1].values.is_empty());
}

#[tokio::test]
async fn resolve_all_by_location() {
    let results = resolver().resolve_all(Some("Kitchen")).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.asset.id.as_str()).collect();
    assert_eq!(ids, vec!["LB01", "NT02"]);

    let everything = resolver().resolve_all(None).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn filtered_category_view() {
    let result = resolver().resolve(Some("NT01"), None).await.unwrap().unwrap();

    let alarms = result.category.filtered(Category::Alarm);
    assert_eq!(alarms.name, Category::Alarm);
    assert_eq!(alarms.streams.len(), 1);
    assert_eq!(alarms.streams[0].stream.id, "NT01.O01");

    assert!(result.category.filtered(Category::Notification).streams.is_empty());
}

#[tokio::test]
async fn result_serializes_as_nested_tree() {
    let result = resolver().resolve(Some("LB01"), None).await.unwrap().unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["asset"]["id"], "LB01");
    assert_eq!(json["category"]["name"], "alarm");
    let value = &json["category"]["streams"][0]["values"][0];
    assert_eq!(value["timestamp"], "20250725T134509Z");
    assert_eq!(value["value"], "1");
    assert_eq!(value["reading"]["kind"], "state");
    assert_eq!(value["reading"]["value"], true);
}

#[test]
fn single_channel_query() {
    let values = resolver()
        .get_operational_data("NT01", "T02", Category::Utilization)
        .unwrap();
    let raw: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(raw, vec!["75", "74", "73.5"]);

    let none = resolver()
        .get_operational_data("NT01", "T02", Category::Alarm)
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn single_channel_query_with_time_bounds() {
    let from = "20250725T110000Z".parse().unwrap();
    let values = resolver()
        .get_operational_data_between("NT01", "T02", Category::Utilization, Some(from), None)
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].timestamp, "20250725T112658Z");
}

#[test]
fn single_channel_query_rejects_bad_channel() {
    let err = resolver()
        .get_operational_data("NT01", "T2", Category::Utilization)
        .unwrap_err();
    assert!(matches!(err, QueryError::State(_)));
}

struct BrokenCatalog;

impl Catalog for BrokenCatalog {
    fn asset_by_id(&self, _id: &str) -> CatalogResult<Option<Asset>> {
        Err(CatalogError::LookupFailure("catalog offline".to_string()))
    }

    fn assets_by_location(&self, _location: &str) -> CatalogResult<Vec<Asset>> {
        Err(CatalogError::LookupFailure("catalog offline".to_string()))
    }

    fn all_assets(&self) -> CatalogResult<Vec<Asset>> {
        Err(CatalogError::LookupFailure("catalog offline".to_string()))
    }

    fn streams_by_asset_id(&self, _asset_id: &str) -> CatalogResult<Vec<Stream>> {
        Err(CatalogError::LookupFailure("catalog offline".to_string()))
    }
}

#[tokio::test]
async fn catalog_errors_propagate() {
    let resolver = Resolver::new(test_store(), Arc::new(BrokenCatalog));
    let err = resolver.resolve(Some("NT01"), None).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Catalog(CatalogError::LookupFailure(_))
    ));
}
