// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use folio_engine::{Document, DocumentOptions, ListType, RawNode};

#[allow(dead_code)]
pub fn generate_paragraphs(count: usize) -> RawNode {
    let children = (0..count)
        .map(|index| RawNode::paragraph(&format!("Paragraph {index} with some content.")))
        .collect();
    RawNode::new("article").with_children(children)
}

#[allow(dead_code)]
pub fn generate_lists(lists: usize, items: usize) -> RawNode {
    let children = (0..lists)
        .map(|list| {
            let list_type = if list % 2 == 0 { ListType::Ol } else { ListType::Ul };
            let entries = (0..items)
                .map(|item| RawNode::paragraph(&format!("Item {list}.{item}")))
                .collect();
            RawNode::list(list_type, entries)
        })
        .collect();
    RawNode::new("article").with_children(children)
}

#[allow(dead_code)]
pub fn document(raw: &RawNode) -> Document {
    Document::from_raw(raw, DocumentOptions::default()).expect("benchmark document")
}
