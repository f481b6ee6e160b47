//! CRUD resource mocks over a storage tree.
//!
//! A `ResourceMock` mounts one simulated REST resource family. Construction
//! registers five routes with the injected transport registry; method plus
//! pattern shape encode the collection/item classification, so a method at
//! the wrong shape (PUT on the collection path, say) matches nothing and
//! falls through to the transport's no-match outcome.

use crate::error::MockError;
use crate::mocks::basic::BasicMock;
use crate::storage::{locate, locate_mut, DataSource};
use crate::transport::TransportRegistry;
use crate::types::options::{DebugFn, MockOptions, OptionsPatch};
use crate::types::request::{HttpMethod, HttpRequest};
use crate::types::response::{HttpError, RouteResult};
use serde_json::{json, Map, Value};
use std::rc::Rc;

/// Whether a payload addresses the whole collection or one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plurality {
    Collection,
    Singleton,
}

/// A mounted REST resource family backed by a storage tree.
///
/// Cloning yields another handle onto the same mock (shared options and
/// data), mirroring the handles captured by the registered routes.
#[derive(Clone)]
pub struct ResourceMock {
    base: BasicMock,
    data: DataSource,
    required_args: usize,
}

/// Convenience constructor mirroring [`ResourceMock::create`].
pub fn create_resource_mock(
    registry: &mut dyn TransportRegistry,
    template: &str,
    data: DataSource,
    options: MockOptions,
) -> Result<ResourceMock, MockError> {
    ResourceMock::create(registry, template, data, options)
}

impl ResourceMock {
    /// Mount a resource at `template` and register its five CRUD routes.
    ///
    /// The template must be non-empty and match the `(/segment)+` grammar;
    /// `?` segments are the identifier chain filled by concrete requests.
    pub fn create(
        registry: &mut dyn TransportRegistry,
        template: &str,
        data: DataSource,
        options: MockOptions,
    ) -> Result<Self, MockError> {
        if template.is_empty() {
            return Err(MockError::InvalidTemplate {
                template: String::new(),
            });
        }
        let base = BasicMock::new(template, options)?;
        let required_args = template.split('/').skip(1).filter(|s| *s == "?").count();
        let mock = Self {
            base,
            data,
            required_args,
        };
        mock.register_routes(registry)?;
        Ok(mock)
    }

    /// Mount a child resource at `parent template + "/?" + suffix`.
    ///
    /// The child is independently configured; its path always requires the
    /// parent's identifier chain as a prefix. Pass a clone of the parent's
    /// [`DataSource`] to share storage deliberately.
    pub fn sub_resource_mock(
        &self,
        registry: &mut dyn TransportRegistry,
        suffix: &str,
        data: DataSource,
        options: MockOptions,
    ) -> Result<ResourceMock, MockError> {
        let template = format!("{}/?{}", self.base.base_template(), suffix);
        Self::create(registry, &template, data, options)
    }

    /// Merge a typed partial options record; returns self for chaining.
    pub fn set_options(&self, patch: OptionsPatch) -> &Self {
        self.base.set_options(patch);
        self
    }

    /// Merge options from external JSON input, rejecting unknown keys.
    pub fn set_options_value(&self, value: &Value) -> Result<&Self, MockError> {
        self.base.set_options_value(value)?;
        Ok(self)
    }

    /// Install a custom debug hook.
    pub fn set_debug_hook(&self, hook: Rc<DebugFn>) -> &Self {
        self.base.set_debug_hook(hook);
        self
    }

    /// Handle onto the mock's storage tree.
    pub fn data(&self) -> DataSource {
        self.data.clone()
    }

    /// The mounted template.
    pub fn template(&self) -> String {
        self.base.base_template()
    }

    /// Number of identifiers a collection-level request must supply.
    pub fn required_args(&self) -> usize {
        self.required_args
    }

    fn register_routes(&self, registry: &mut dyn TransportRegistry) -> Result<(), MockError> {
        let m = self.clone();
        self.base.route(
            registry,
            HttpMethod::Get,
            "",
            Box::new(move |request| {
                let result = m.index_action(request);
                m.label_encap(Plurality::Collection, result)
            }),
        )?;

        let m = self.clone();
        self.base.route(
            registry,
            HttpMethod::Get,
            "/?",
            Box::new(move |request| {
                let result = m.show_action(request);
                m.label_encap(Plurality::Singleton, result)
            }),
        )?;

        let m = self.clone();
        self.base.route(
            registry,
            HttpMethod::Post,
            "",
            Box::new(move |request| {
                let result = m.create_action(request);
                m.label_encap(Plurality::Singleton, result)
            }),
        )?;

        let m = self.clone();
        self.base.route(
            registry,
            HttpMethod::Put,
            "/?",
            Box::new(move |request| {
                let result = m.update_action(request);
                m.label_encap(Plurality::Singleton, result)
            }),
        )?;

        let m = self.clone();
        self.base.route(
            registry,
            HttpMethod::Delete,
            "/?",
            Box::new(move |request| {
                let result = m.delete_action(request);
                m.label_encap(Plurality::Singleton, result)
            }),
        )?;

        Ok(())
    }

    /// List the addressed collection, sorted by key, optionally paginated.
    fn index_action(&self, request: &HttpRequest) -> RouteResult {
        let root = self.data.root();
        let Some(storage) = locate(&root, &request.path_args) else {
            return Ok(None);
        };
        let Some(map) = storage.as_object() else {
            return Ok(None);
        };

        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_by_key(|key| key_order(key));

        let options = self.base.options();
        let skip = page_param(request, options.skip_argument_name.as_deref()).unwrap_or(0);
        let limit =
            page_param(request, options.limit_argument_name.as_deref()).unwrap_or(usize::MAX);

        let items: Vec<Value> = keys
            .into_iter()
            .skip(skip)
            .take(limit)
            .filter_map(|key| map.get(key).cloned())
            .collect();
        Ok(Some(Value::Array(items)))
    }

    /// Read the item addressed by the full identifier path.
    fn show_action(&self, request: &HttpRequest) -> RouteResult {
        let root = self.data.root();
        Ok(locate(&root, &request.path_args).cloned())
    }

    /// Insert the request body under a freshly generated id.
    ///
    /// The id is a random u32; collisions are considered negligible and are
    /// not checked. The containing node is auto-created along the way.
    fn create_action(&self, request: &HttpRequest) -> RouteResult {
        let Some(Value::Object(mut item)) = request.body.clone() else {
            return Err(HttpError::bad_request());
        };

        let id: u32 = rand::random();
        item.insert("id".to_string(), json!(id));

        let mut root = self.data.root_mut();
        let Some(storage) =
            locate_mut(&mut root, &request.path_args, true).and_then(Value::as_object_mut)
        else {
            return Ok(None);
        };
        let stored = Value::Object(item);
        storage.insert(id.to_string(), stored.clone());
        Ok(Some(stored))
    }

    /// Replace the addressed item, forcing the stored id onto the new body.
    fn update_action(&self, request: &HttpRequest) -> RouteResult {
        let Some((item_id, parent_ids)) = request.path_args.split_last() else {
            return Ok(None);
        };
        let mut root = self.data.root_mut();
        let Some(storage) =
            locate_mut(&mut root, parent_ids, false).and_then(Value::as_object_mut)
        else {
            return Ok(None);
        };
        let Some(existing) = storage.get(item_id) else {
            return Ok(None);
        };
        let existing_id = existing.get("id").cloned();

        let Some(Value::Object(mut item)) = request.body.clone() else {
            return Err(HttpError::bad_request());
        };
        match existing_id {
            Some(id) => {
                item.insert("id".to_string(), id);
            }
            None => {
                item.remove("id");
            }
        }

        let stored = Value::Object(item);
        storage.insert(item_id.clone(), stored.clone());
        Ok(Some(stored))
    }

    /// Remove the addressed item, echoing it back as confirmation.
    fn delete_action(&self, request: &HttpRequest) -> RouteResult {
        let Some((item_id, parent_ids)) = request.path_args.split_last() else {
            return Ok(None);
        };
        let mut root = self.data.root_mut();
        let Some(storage) =
            locate_mut(&mut root, parent_ids, false).and_then(Value::as_object_mut)
        else {
            return Ok(None);
        };
        Ok(storage.remove(item_id.as_str()))
    }

    /// Wrap a success payload under the configured collection or singleton
    /// label; errors and not-found pass through untouched.
    fn label_encap(&self, plurality: Plurality, result: RouteResult) -> RouteResult {
        let payload = match result {
            Ok(Some(payload)) => payload,
            other => return other,
        };
        let options = self.base.options();
        let label = match plurality {
            Plurality::Collection => options.collection_label,
            Plurality::Singleton => options.singleton_label,
        };
        match label {
            Some(label) => {
                let mut wrapped = Map::new();
                wrapped.insert(label, payload);
                Ok(Some(Value::Object(wrapped)))
            }
            None => Ok(Some(payload)),
        }
    }
}

/// Sort key: numeric-looking keys first in numeric order, then the rest
/// lexicographically. Coercion is for ordering only; the original key string
/// still fetches the item.
fn key_order(key: &str) -> (u8, u64, String) {
    match key.parse::<u64>() {
        Ok(n) => (0, n, String::new()),
        Err(_) => (1, 0, key.to_string()),
    }
}

/// Positive integer query parameter, when pagination is configured and the
/// value parses; anything else is ignored.
fn page_param(request: &HttpRequest, name: Option<&str>) -> Option<usize> {
    let name = name?;
    request
        .query_param(name)?
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockBackend;
    use crate::types::response::MockResponse;
    use rstest::rstest;
    use std::collections::HashMap;

    fn books() -> DataSource {
        DataSource::from(json!({
            "1": { "id": 1, "title": "Alpha" },
            "2": { "id": 2, "title": "Beta" },
            "3": { "id": 3, "title": "Gamma" }
        }))
    }

    fn mount(backend: &mut MockBackend) -> ResourceMock {
        ResourceMock::create(backend, "/books", books(), MockOptions::default()).unwrap()
    }

    fn get(backend: &mut MockBackend, url: &str) -> MockResponse {
        backend
            .handle(HttpMethod::Get, url, None, &HashMap::new())
            .expect("route should match")
    }

    fn send(
        backend: &mut MockBackend,
        method: HttpMethod,
        url: &str,
        body: &Value,
    ) -> MockResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        backend
            .handle(method, url, Some(&body.to_string()), &headers)
            .expect("route should match")
    }

    #[rstest]
    #[case("books")]
    #[case("")]
    #[case("/books/")]
    fn test_create_rejects_invalid_template(#[case] template: &str) {
        let mut backend = MockBackend::new();
        let result =
            ResourceMock::create(&mut backend, template, DataSource::new(), MockOptions::default());
        assert!(matches!(result, Err(MockError::InvalidTemplate { .. })));
    }

    #[rstest]
    #[case("/books", 0)]
    #[case("/stores/?/foods", 1)]
    #[case("/a/?/b/?/c", 2)]
    fn test_required_args(#[case] template: &str, #[case] expected: usize) {
        let mut backend = MockBackend::new();
        let mock =
            ResourceMock::create(&mut backend, template, DataSource::new(), MockOptions::default())
                .unwrap();
        assert_eq!(mock.required_args(), expected);
        assert_eq!(backend.route_count(), 5);
    }

    #[rstest]
    fn test_index_returns_items_sorted_by_key() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = get(&mut backend, "/books");
        assert_eq!(response.status, 200);
        assert_eq!(
            response.json(),
            json!([
                { "id": 1, "title": "Alpha" },
                { "id": 2, "title": "Beta" },
                { "id": 3, "title": "Gamma" }
            ])
        );
    }

    #[rstest]
    fn test_index_sorts_numeric_keys_numerically() {
        let mut backend = MockBackend::new();
        let data = DataSource::from(json!({
            "10": { "id": 10 },
            "9": { "id": 9 },
            "2": { "id": 2 }
        }));
        ResourceMock::create(&mut backend, "/books", data, MockOptions::default()).unwrap();

        let response = get(&mut backend, "/books");
        assert_eq!(response.json(), json!([{ "id": 2 }, { "id": 9 }, { "id": 10 }]));
    }

    #[rstest]
    fn test_index_orders_numeric_keys_before_string_keys() {
        let mut backend = MockBackend::new();
        let data = DataSource::from(json!({
            "banana": { "id": "banana" },
            "10": { "id": 10 },
            "apple": { "id": "apple" },
            "2": { "id": 2 }
        }));
        ResourceMock::create(&mut backend, "/books", data, MockOptions::default()).unwrap();

        let response = get(&mut backend, "/books");
        assert_eq!(
            response.json(),
            json!([{ "id": 2 }, { "id": 10 }, { "id": "apple" }, { "id": "banana" }])
        );
    }

    #[rstest]
    fn test_show_returns_item_and_miss_is_404() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let hit = get(&mut backend, "/books/2");
        assert_eq!(hit.status, 200);
        assert_eq!(hit.json(), json!({ "id": 2, "title": "Beta" }));

        let miss = get(&mut backend, "/books/99");
        assert_eq!(miss.status, 404);
        assert_eq!(miss.json(), json!({ "code": 404, "message": "Not Found" }));
    }

    #[rstest]
    fn test_create_generates_fresh_id_and_item_is_retrievable() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = send(
            &mut backend,
            HttpMethod::Post,
            "/books",
            &json!({ "title": "Delta" }),
        );
        assert_eq!(response.status, 200);
        let created = response.json();
        assert_eq!(created["title"], "Delta");
        let id = created["id"].as_u64().expect("generated numeric id");
        assert!(![1, 2, 3].contains(&id));

        let fetched = get(&mut backend, &format!("/books/{id}"));
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.json(), created);
    }

    #[rstest]
    fn test_create_with_non_object_body_is_bad_request() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = send(&mut backend, HttpMethod::Post, "/books", &json!([1, 2]));
        assert_eq!(response.status, 400);
    }

    #[rstest]
    fn test_update_replaces_fields_but_preserves_id() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = send(
            &mut backend,
            HttpMethod::Put,
            "/books/2",
            &json!({ "id": 777, "title": "Beta II", "pages": 321 }),
        );
        assert_eq!(response.status, 200);
        assert_eq!(
            response.json(),
            json!({ "id": 2, "title": "Beta II", "pages": 321 })
        );

        // the old fields are gone, not merged
        let fetched = get(&mut backend, "/books/2");
        assert_eq!(
            fetched.json(),
            json!({ "id": 2, "title": "Beta II", "pages": 321 })
        );
    }

    #[rstest]
    fn test_update_missing_item_is_404() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = send(
            &mut backend,
            HttpMethod::Put,
            "/books/99",
            &json!({ "title": "Ghost" }),
        );
        assert_eq!(response.status, 404);
    }

    #[rstest]
    fn test_delete_echoes_item_once_then_404() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let first = backend
            .handle(HttpMethod::Delete, "/books/3", None, &HashMap::new())
            .unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.json(), json!({ "id": 3, "title": "Gamma" }));

        let second = backend
            .handle(HttpMethod::Delete, "/books/3", None, &HashMap::new())
            .unwrap();
        assert_eq!(second.status, 404);

        let fetched = get(&mut backend, "/books/3");
        assert_eq!(fetched.status, 404);
    }

    #[rstest]
    fn test_method_at_wrong_shape_matches_nothing() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        // PUT at collection level and POST at item level are unregistered
        assert!(backend
            .handle(HttpMethod::Put, "/books", Some("{}"), &HashMap::new())
            .is_none());
        assert!(backend
            .handle(HttpMethod::Post, "/books/1", Some("{}"), &HashMap::new())
            .is_none());
    }

    #[rstest]
    fn test_repeated_get_never_mutates_storage() {
        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        let before = mock.data().snapshot();

        get(&mut backend, "/books");
        get(&mut backend, "/books/1");
        get(&mut backend, "/books/99");
        get(&mut backend, "/books");

        assert_eq!(mock.data().snapshot(), before);
    }

    #[rstest]
    fn test_sub_resource_addresses_nested_storage() {
        let mut backend = MockBackend::new();
        let stores = ResourceMock::create(
            &mut backend,
            "/stores",
            DataSource::from(json!({ "7": { "id": 7, "name": "corner" } })),
            MockOptions::default(),
        )
        .unwrap();

        let foods_data = DataSource::from(json!({
            "7": { "42": { "id": 42, "name": "bread" } }
        }));
        let foods = stores
            .sub_resource_mock(&mut backend, "/foods", foods_data, MockOptions::default())
            .unwrap();
        assert_eq!(foods.template(), "/stores/?/foods");
        assert_eq!(foods.required_args(), 1);

        let response = get(&mut backend, "/stores/7/foods/42");
        assert_eq!(response.status, 200);
        assert_eq!(response.json(), json!({ "id": 42, "name": "bread" }));

        let listing = get(&mut backend, "/stores/7/foods");
        assert_eq!(listing.json(), json!([{ "id": 42, "name": "bread" }]));
    }

    #[rstest]
    fn test_sub_resource_create_autocreates_parent_node() {
        let mut backend = MockBackend::new();
        let stores = ResourceMock::create(
            &mut backend,
            "/stores",
            DataSource::new(),
            MockOptions::default(),
        )
        .unwrap();
        let foods = stores
            .sub_resource_mock(&mut backend, "/foods", DataSource::new(), MockOptions::default())
            .unwrap();

        // parent key "55" does not exist in the child's tree yet
        let response = send(
            &mut backend,
            HttpMethod::Post,
            "/stores/55/foods",
            &json!({ "name": "cheese" }),
        );
        assert_eq!(response.status, 200);
        let id = response.json()["id"].as_u64().unwrap();

        let fetched = get(&mut backend, &format!("/stores/55/foods/{id}"));
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.json()["name"], "cheese");

        // only the nested data node was created, not a parent resource item
        assert!(stores.data().item(&["55"]).is_none());
        assert!(foods.data().item(&["55"]).is_some());
    }

    #[rstest]
    fn test_collection_and_singleton_labels() {
        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        mock.set_options_value(&json!({
            "collectionLabel": "books",
            "singletonLabel": "book"
        }))
        .unwrap();

        let listing = get(&mut backend, "/books");
        assert_eq!(listing.json()["books"].as_array().unwrap().len(), 3);

        let single = get(&mut backend, "/books/1");
        assert_eq!(single.json(), json!({ "book": { "id": 1, "title": "Alpha" } }));

        let created = send(
            &mut backend,
            HttpMethod::Post,
            "/books",
            &json!({ "title": "Delta" }),
        );
        assert_eq!(created.json()["book"]["title"], "Delta");
    }

    #[rstest]
    fn test_labels_combined_with_response_info_label() {
        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        mock.set_options_value(&json!({
            "collectionLabel": "books",
            "singletonLabel": "book",
            "httpResponseInfoLabel": "response"
        }))
        .unwrap();

        let listing = get(&mut backend, "/books");
        let body = listing.json();
        assert_eq!(body["books"].as_array().unwrap().len(), 3);
        assert_eq!(body["response"], json!({ "code": 200, "message": "OK" }));

        let miss = get(&mut backend, "/books/99");
        assert_eq!(
            miss.json(),
            json!({ "response": { "code": 404, "message": "Not Found" } })
        );
    }

    #[rstest]
    fn test_labels_do_not_wrap_errors() {
        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        mock.set_options_value(&json!({ "singletonLabel": "book" })).unwrap();

        let miss = get(&mut backend, "/books/99");
        assert_eq!(miss.json(), json!({ "code": 404, "message": "Not Found" }));
    }

    #[rstest]
    #[case("/books?offset=1", json!([{ "id": 2, "title": "Beta" }, { "id": 3, "title": "Gamma" }]))]
    #[case("/books?count=2", json!([{ "id": 1, "title": "Alpha" }, { "id": 2, "title": "Beta" }]))]
    #[case("/books?offset=1&count=1", json!([{ "id": 2, "title": "Beta" }]))]
    #[case("/books?offset=0", json!([
        { "id": 1, "title": "Alpha" },
        { "id": 2, "title": "Beta" },
        { "id": 3, "title": "Gamma" }
    ]))]
    #[case("/books?offset=nope", json!([
        { "id": 1, "title": "Alpha" },
        { "id": 2, "title": "Beta" },
        { "id": 3, "title": "Gamma" }
    ]))]
    #[case("/books?count=0", json!([
        { "id": 1, "title": "Alpha" },
        { "id": 2, "title": "Beta" },
        { "id": 3, "title": "Gamma" }
    ]))]
    fn test_index_pagination(#[case] url: &str, #[case] expected: Value) {
        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        mock.set_options_value(&json!({
            "skipArgumentName": "offset",
            "limitArgumentName": "count"
        }))
        .unwrap();

        assert_eq!(get(&mut backend, url).json(), expected);
    }

    #[rstest]
    fn test_pagination_ignored_when_not_configured() {
        let mut backend = MockBackend::new();
        mount(&mut backend);

        let response = get(&mut backend, "/books?offset=2&count=1");
        assert_eq!(response.json().as_array().unwrap().len(), 3);
    }

    #[rstest]
    fn test_debug_hook_observes_resource_responses() {
        use std::cell::RefCell;

        let mut backend = MockBackend::new();
        let mock = mount(&mut backend);
        let seen: Rc<RefCell<Vec<u16>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        mock.set_debug_hook(Rc::new(move |_req, info, _body| {
            sink.borrow_mut().push(info.code);
        }));

        get(&mut backend, "/books/1");
        get(&mut backend, "/books/99");

        assert_eq!(*seen.borrow(), vec![200, 404]);
    }

    #[rstest]
    fn test_registration_order_precedence_across_mocks() {
        let mut backend = MockBackend::new();
        ResourceMock::create(
            &mut backend,
            "/things/special",
            DataSource::from(json!({ "1": { "id": 1, "kind": "special" } })),
            MockOptions::default(),
        )
        .unwrap();
        ResourceMock::create(
            &mut backend,
            "/things/?",
            DataSource::from(json!({ "special": { "1": { "id": 1, "kind": "generic" } } })),
            MockOptions::default(),
        )
        .unwrap();

        // both item patterns match /things/special/1; the earlier mock wins
        let response = get(&mut backend, "/things/special/1");
        assert_eq!(response.json()["kind"], "special");
    }
}
