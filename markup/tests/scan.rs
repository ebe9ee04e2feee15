use markup::{Piece, Scanner, normalize};
use pretty_assertions::assert_eq;

fn pieces(src: &str) -> Vec<Piece<'_>> {
    Scanner::new(src).collect()
}

#[test]
fn splits_text_and_tags() {
    assert_eq!(
        pieces(r#"a<span class="c">b</span>c"#),
        vec![
            Piece::Text("a"),
            Piece::Open(r#"<span class="c">"#),
            Piece::Text("b"),
            Piece::Close("</span>"),
            Piece::Text("c"),
        ]
    );
}

#[test]
fn stray_angle_brackets_are_text() {
    assert_eq!(pieces("a < b"), vec![Piece::Text("a < b")]);
    assert_eq!(pieces("1<2"), vec![Piece::Text("1<2")]);
    assert_eq!(pieces("<</span>"), vec![Piece::Text("<"), Piece::Close("</span>")]);
}

#[test]
fn unterminated_tag_is_text() {
    assert_eq!(
        pieces(r#"x<span class="c"#),
        vec![Piece::Text(r#"x<span class="c"#)]
    );
}

#[test]
fn text_runs_are_maximal() {
    assert_eq!(
        pieces("a<1<b>"),
        vec![Piece::Text("a<1"), Piece::Open("<b>")]
    );
}

#[test]
fn pieces_reproduce_input() {
    let src = "<span class=\"k\">let</span> x = 1 < 2;\n<span class=\"c\">// é</span>\n";
    let joined: String = Scanner::new(src).map(|p| p.as_str()).collect();
    assert_eq!(joined, src);
}

#[test]
fn long_run_of_unterminated_tags() {
    let n = 50_000;
    let src = format!("{}>", "<a ".repeat(n));
    let text = "<a ".repeat(n - 1);
    assert_eq!(pieces(&src), vec![Piece::Text(&text), Piece::Open("<a >")]);
    assert_eq!(normalize(&src), src);
}
