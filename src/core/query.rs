use url::form_urlencoded;

/// Percent-encode an XML fragment for the `element`/`cmd` parameters.
///
/// PAN-OS decodes the parameter and then parses it as XML, so every `&`
/// has to arrive as `&amp;`: after encoding, each `%26` becomes `%26amp;`.
/// Spaces are sent as `%20` since a literal `+` is already `%2B`.
pub fn encode_xml_param(fragment: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(fragment.as_bytes()).collect();
    encoded.replace('+', "%20").replace("%26", "%26amp;")
}

pub fn set_tag_query(xpath: &str, tag: &str) -> String {
    let element = format!("<entry name='{}'/>", tag);
    format!(
        "type=config&action=set&xpath={}&element={}",
        xpath,
        encode_xml_param(&element)
    )
}

pub fn commit_query(description: &str) -> String {
    let cmd = format!(
        "<commit><description>{}</description></commit>",
        description
    );
    format!("type=commit&cmd={}", encode_xml_param(&cmd))
}
