//! Mutations over an in-memory collection sorted by `order`.
//! Every operation that changes membership or position renumbers before
//! returning, so callers can save the result as is.

use crate::error::{Result, ShelfError};
use crate::record::{ItemType, Record, UriScheme};

pub fn sort_by_order(items: &mut [Record]) {
    items.sort_by_key(|r| r.order);
}

/// Reassign `order` from sequence position: 0..N-1.
pub fn renumber(items: &mut [Record]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.order = idx as u32;
    }
}

fn position(items: &[Record], order: u32) -> Result<usize> {
    items
        .iter()
        .position(|r| r.order == order)
        .ok_or(ShelfError::NotFound { order })
}

fn find_mut(items: &mut [Record], order: u32) -> Result<&mut Record> {
    let idx = position(items, order)?;
    Ok(&mut items[idx])
}

/// Prepend an empty record; existing items shift down by one.
pub fn add(items: &mut Vec<Record>) -> u32 {
    for item in items.iter_mut() {
        item.order += 1;
    }
    items.insert(0, Record::empty());
    renumber(items);
    0
}

pub fn delete(items: &mut Vec<Record>, order: u32) -> Result<Record> {
    let idx = position(items, order)?;
    let removed = items.remove(idx);
    renumber(items);
    Ok(removed)
}

pub fn move_to_top(items: &mut Vec<Record>, order: u32) -> Result<()> {
    let idx = position(items, order)?;
    let item = items.remove(idx);
    items.insert(0, item);
    renumber(items);
    Ok(())
}

/// Drag-style reorder: the item lands where `to` sat before removal.
/// Returns the item's new order. `to` past the end clamps to the end.
pub fn move_item(items: &mut Vec<Record>, from: u32, to: u32) -> Result<u32> {
    let from_idx = position(items, from)?;
    let to_idx = position(items, to).unwrap_or(items.len());
    let item = items.remove(from_idx);
    let to_idx = to_idx.min(items.len());
    items.insert(to_idx, item);
    renumber(items);
    Ok(to_idx as u32)
}

/// Switching type discards whatever was typed for the old one.
pub fn retype(items: &mut [Record], order: u32, kind: ItemType) -> Result<()> {
    let item = find_mut(items, order)?;
    item.kind = kind;
    item.content.clear();
    item.note.clear();
    Ok(())
}

/// Returns the new masked state.
pub fn toggle_mask(items: &mut [Record], order: u32) -> Result<bool> {
    let item = find_mut(items, order)?;
    item.masked = !item.masked;
    Ok(item.masked)
}

/// Keystroke edit: store the text exactly as typed.
pub fn edit_content(items: &mut [Record], order: u32, text: &str) -> Result<()> {
    find_mut(items, order)?.content = text.to_string();
    Ok(())
}

/// Blur: apply type prefixing to non-blank content.
pub fn commit_content(
    items: &mut [Record],
    order: u32,
    uri: &UriScheme,
) -> Result<String> {
    let item = find_mut(items, order)?;
    if item.has_content() {
        item.content = uri.normalize_content(item.kind, &item.content);
    }
    Ok(item.content.clone())
}

pub fn edit_note(items: &mut [Record], order: u32, text: &str) -> Result<()> {
    find_mut(items, order)?.note = text.to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Record {
                kind: ItemType::Custom,
                content: name.to_string(),
                note: String::new(),
                order: idx as u32,
                masked: false,
            })
            .collect()
    }

    fn contents(items: &[Record]) -> Vec<&str> {
        items.iter().map(|r| r.content.as_str()).collect()
    }

    fn assert_contiguous(items: &[Record]) {
        let mut orders: Vec<u32> = items.iter().map(|r| r.order).collect();
        orders.sort_unstable();
        let expected: Vec<u32> = (0..items.len() as u32).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_add_prepends_and_shifts() {
        let mut items = named(&["a", "b"]);
        assert_eq!(add(&mut items), 0);
        assert_eq!(contents(&items), vec!["", "a", "b"]);
        assert_eq!(items[1].order, 1);
        assert_eq!(items[2].order, 2);
        assert_eq!(items[0].kind, ItemType::Video);
    }

    #[test]
    fn test_delete_renumbers() {
        let mut items = named(&["a", "b", "c"]);
        let removed = delete(&mut items, 1).unwrap();
        assert_eq!(removed.content, "b");
        assert_eq!(contents(&items), vec!["a", "c"]);
        assert_eq!(items[1].order, 1);
    }

    #[test]
    fn test_move_to_top() {
        let mut items = named(&["a", "b", "c"]);
        move_to_top(&mut items, 2).unwrap();
        assert_eq!(contents(&items), vec!["c", "a", "b"]);
        assert_contiguous(&items);
    }

    #[test]
    fn test_move_uses_splice_semantics() {
        let mut items = named(&["a", "b", "c", "d"]);
        assert_eq!(move_item(&mut items, 0, 2).unwrap(), 2);
        assert_eq!(contents(&items), vec!["b", "c", "a", "d"]);

        let mut items = named(&["a", "b", "c", "d"]);
        assert_eq!(move_item(&mut items, 3, 1).unwrap(), 1);
        assert_eq!(contents(&items), vec!["a", "d", "b", "c"]);

        let mut items = named(&["a", "b", "c"]);
        assert_eq!(move_item(&mut items, 0, 99).unwrap(), 2);
        assert_eq!(contents(&items), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let mut items = named(&["a"]);
        assert!(matches!(
            delete(&mut items, 5),
            Err(ShelfError::NotFound { order: 5 })
        ));
        assert!(move_item(&mut items, 3, 0).is_err());
        assert!(toggle_mask(&mut items, 1).is_err());
        assert_eq!(contents(&items), vec!["a"]);
    }

    #[test]
    fn test_retype_clears_content_and_note() {
        let mut items = named(&["a"]);
        items[0].note = "keep?".to_string();
        items[0].masked = true;
        retype(&mut items, 0, ItemType::User).unwrap();
        assert_eq!(items[0].kind, ItemType::User);
        assert!(items[0].content.is_empty());
        assert!(items[0].note.is_empty());
        assert!(items[0].masked);
    }

    #[test]
    fn test_toggle_mask_flips() {
        let mut items = named(&["a"]);
        assert!(toggle_mask(&mut items, 0).unwrap());
        assert!(!toggle_mask(&mut items, 0).unwrap());
    }

    #[test]
    fn test_edit_then_commit_content() {
        let uri = UriScheme::new("scheme");
        let mut items = vec![Record::empty()];
        edit_content(&mut items, 0, "12345").unwrap();
        assert_eq!(items[0].content, "12345");
        let committed = commit_content(&mut items, 0, &uri).unwrap();
        assert_eq!(committed, "scheme://video/12345");
        let again = commit_content(&mut items, 0, &uri).unwrap();
        assert_eq!(again, committed);

        edit_content(&mut items, 0, "   ").unwrap();
        assert_eq!(commit_content(&mut items, 0, &uri).unwrap(), "   ");
    }

    #[test]
    fn test_orders_stay_contiguous_over_mixed_sequences() {
        // Deterministic LCG so failures reproduce.
        let mut seed: u64 = 0x5eed;
        let mut next = |bound: u32| -> u32 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if bound == 0 { 0 } else { ((seed >> 33) as u32) % bound }
        };
        let mut items: Vec<Record> = Vec::new();
        for _ in 0..500 {
            let len = items.len() as u32;
            match next(4) {
                0 => {
                    add(&mut items);
                }
                1 if len > 0 => {
                    delete(&mut items, next(len)).unwrap();
                }
                2 if len > 0 => {
                    move_to_top(&mut items, next(len)).unwrap();
                }
                3 if len > 0 => {
                    let from = next(len);
                    let to = next(len + 1);
                    move_item(&mut items, from, to).unwrap();
                }
                _ => {
                    add(&mut items);
                }
            }
            assert_contiguous(&items);
            for (idx, item) in items.iter().enumerate() {
                assert_eq!(item.order, idx as u32);
            }
        }
    }
}
