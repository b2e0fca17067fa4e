use mapsvg::rendering::format::{dimension, escape_attr, fill_style, number};
use mapsvg::Color;

#[test]
fn smoke_formatters() {
    assert_eq!(dimension(256), "256px");
    assert_eq!(number(1.1), "1.1");
    assert_eq!(escape_attr("a<b"), "a&lt;b");
    assert_eq!(fill_style(&Color::rgb(255, 255, 255)), "fill: #ffffff");
}
