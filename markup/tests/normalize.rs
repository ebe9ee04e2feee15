use markup::{first_divergence, normalize, strip_tags};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn span(class: &str) -> String {
    format!(r#"<span class="{}">"#, class)
}

#[test]
fn adjacent_identical_spans_merge() {
    let input = r#"<span class="c">a</span><span class="c">b</span>"#;
    assert_eq!(normalize(input), r#"<span class="c">ab</span>"#);
}

#[test]
fn intervening_text_blocks_the_merge() {
    let input = r#"<span class="c">a</span>X<span class="c">b</span>"#;
    assert_eq!(normalize(input), input);
}

#[test]
fn different_classes_do_not_merge() {
    let input = r#"<span class="c">a</span><span class="d">b</span>"#;
    assert_eq!(normalize(input), input);
}

#[test]
fn newline_between_spans_blocks_the_merge() {
    let input = concat!(
        r#"<span class="c">/*</span>"#,
        "\n",
        r#"<span class="c">mid</span>"#,
        "\n",
        r#"<span class="c">*/</span>"#,
    );
    assert_eq!(normalize(input), input);
}

#[test]
fn line_split_comment_collapses_to_one_span() {
    let chunked = concat!(
        r#"<span class="hljs-comment">/* one"#,
        "\n",
        r#"</span><span class="hljs-comment">two */</span>"#,
    );
    let whole = concat!(r#"<span class="hljs-comment">/* one"#, "\n", "two */</span>");
    assert_eq!(normalize(chunked), whole);
}

#[test]
fn outer_span_merges_across_inner_close() {
    let input = r#"<span class="c"><span class="d">a</span></span><span class="c">b</span>"#;
    assert_eq!(
        normalize(input),
        r#"<span class="c"><span class="d">a</span>b</span>"#
    );
}

#[test]
fn inner_tag_at_wrong_depth_does_not_merge() {
    // The open after two closes must match the outer span, not the inner one.
    let input = r#"<span class="c"><span class="d">a</span></span><span class="d">b</span>"#;
    assert_eq!(normalize(input), input);
}

#[test]
fn multi_level_nesting_reopens_level_by_level() {
    let (a, b, c) = (span("a"), span("b"), span("c"));
    let chunked = format!(
        "{a}{b}{c}x\n</span></span></span>{a}{b}{c}y</span></span></span>"
    );
    let whole = format!("{a}{b}{c}x\ny</span></span></span>");
    assert_eq!(normalize(&chunked), whole);
}

#[test]
fn partial_reopen_commits_the_rest() {
    let (a, b, e) = (span("a"), span("b"), span("e"));
    let input = format!("{a}{b}x</span></span>{a}{e}y</span></span>");
    assert_eq!(
        normalize(&input),
        format!("{a}{b}x</span>{e}y</span></span>")
    );
}

#[test]
fn single_pass_rendering_is_unchanged() {
    let input = concat!(
        r#"<span class="hljs-keyword">fn</span> "#,
        r#"<span class="hljs-title function_">main</span>() {"#,
        "\n",
        r#"    <span class="hljs-comment">/* a"#,
        "\n",
        r#"    b */</span>"#,
        "\n}",
    );
    assert_eq!(normalize(input), input);
}

#[test]
fn stray_closes_do_not_panic() {
    assert_eq!(normalize("a</span></span>b"), "a</span></span>b");
    assert_eq!(
        normalize(r#"</span></span><span class="c">x</span>"#),
        r#"</span></span><span class="c">x</span>"#
    );
}

#[test]
fn empty_input() {
    assert_eq!(normalize(""), "");
}

#[test]
fn strip_tags_keeps_only_text() {
    assert_eq!(
        strip_tags(r#"<span class="c">a<span class="d">b</span></span> c"#),
        "ab c"
    );
}

#[test]
fn divergence_points_at_first_difference() {
    assert_eq!(first_divergence("abc", "abc"), None);
    assert_eq!(first_divergence("abc", "abd"), Some(2));
    assert_eq!(first_divergence("ab", "abc"), Some(2));
    assert_eq!(first_divergence("abc", "ab"), Some(2));
    assert_eq!(first_divergence("é1", "é2"), Some(2));
}

// ---------------------------------------------------------------------------
// Properties over generated span trees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Span(&'static str, Vec<Node>),
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = "[ab x\\n]{1,6}".prop_map(Node::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(vec!["c", "d", "e"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(class, children)| Node::Span(class, children))
    })
}

fn document_strategy() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(node_strategy(), 0..5)
}

/// Render as a whole-document pass would.
fn render_whole(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Span(class, children) => {
                out.push_str(&span(class));
                render_whole(children, out);
                out.push_str("</span>");
            }
        }
    }
}

/// Render as a line-at-a-time pass would: after each line terminator every
/// open span is closed and then reopened for the next line.
fn render_chunked(nodes: &[Node], open: &mut Vec<&'static str>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                for fragment in markup::lines(text) {
                    out.push_str(fragment);
                    if fragment.ends_with('\n') {
                        for _ in open.iter() {
                            out.push_str("</span>");
                        }
                        for class in open.iter() {
                            out.push_str(&span(class));
                        }
                    }
                }
            }
            Node::Span(class, children) => {
                out.push_str(&span(class));
                open.push(*class);
                render_chunked(children, open, out);
                open.pop();
                out.push_str("</span>");
            }
        }
    }
}

fn whole(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_whole(nodes, &mut out);
    out
}

fn chunked(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_chunked(nodes, &mut Vec::new(), &mut out);
    out
}

proptest! {
    #[test]
    fn normalize_is_idempotent(doc in document_strategy()) {
        let once = normalize(&whole(&doc));
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn normalize_preserves_content(doc in document_strategy()) {
        let rendered = chunked(&doc);
        prop_assert_eq!(strip_tags(&normalize(&rendered)), strip_tags(&rendered));
    }

    #[test]
    fn chunked_and_whole_renderings_agree(doc in document_strategy()) {
        prop_assert_eq!(normalize(&chunked(&doc)), normalize(&whole(&doc)));
    }

    #[test]
    fn normalized_output_is_balanced(doc in document_strategy()) {
        let normalized = normalize(&chunked(&doc));
        let mut depth: usize = 0;
        for piece in markup::Scanner::new(&normalized) {
            match piece {
                markup::Piece::Open(_) => depth += 1,
                markup::Piece::Close(_) => {
                    prop_assert!(depth > 0);
                    depth -= 1;
                }
                markup::Piece::Text(_) => {}
            }
        }
        prop_assert_eq!(depth, 0);
    }
}
