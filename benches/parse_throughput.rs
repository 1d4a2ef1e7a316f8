use markup_parser::parse_bytes;

fn main() {
    divan::main();
}

/// Builds a document with `breadth` sibling elements under one root, each
/// carrying attributes and a body, so the benchmark exercises tag_open,
/// tag_name, attribute_name, attribute_value, elm_body, elm_close, and
/// tag_close proportionally without nesting past the node stack's bound.
fn synthetic_document(breadth: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<!DOCTYPE html>\n<html>\n");
    for i in 0..breadth {
        out.extend_from_slice(format!("<p id=\"row-{i}\" class=\"item-{i}\">some body text here</p>\n").as_bytes());
    }
    out.extend_from_slice(b"</html>\n");
    out
}

#[divan::bench(args = [64, 512, 4096])]
fn bench_parse_synthetic_document(bencher: divan::Bencher, breadth: usize) {
    let input = synthetic_document(breadth);

    bencher.bench(|| {
        parse_bytes(&input).expect("synthetic document must parse");
    });
}
