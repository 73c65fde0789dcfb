use super::*;

crate::define_id! {
    pub struct ScratchId("scr-");
}

#[test]
fn new_ids_carry_the_prefix() {
    let id = ScratchId::new();
    assert!(id.as_str().starts_with("scr-"));
    assert_eq!(id.as_str().len(), 23);
}

#[test]
fn from_string_round_trips() {
    let id = ScratchId::from_string("scr-abc");
    assert_eq!(id.as_str(), "scr-abc");
    assert_eq!(id.suffix(), "abc");
}

#[yare::parameterized(
    within_bounds = { 3, "abc" },
    past_the_end = { 100, "abcdef" },
    zero = { 0, "" },
)]
fn short_truncates_the_suffix(n: usize, expected: &str) {
    let id = ScratchId::from_string("scr-abcdef");
    assert_eq!(id.short(n), expected);
}

#[test]
fn ids_are_usable_as_hashmap_keys_by_str() {
    use std::collections::HashMap;
    let mut map: HashMap<ScratchId, u32> = HashMap::new();
    let id = ScratchId::from_string("scr-xyz");
    map.insert(id, 1);
    assert_eq!(map.get::<str>("scr-xyz"), Some(&1));
}

#[test]
fn idbuf_rejects_oversize_on_deserialize() {
    let too_long = "\"scr-012345678901234567890123\"";
    let result: Result<IdBuf, _> = serde_json::from_str(too_long);
    assert!(result.is_err());
}
