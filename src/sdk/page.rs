//! Page URL reconstruction from request parts supplied by the host framework.

/// Rebuilds the signed page URL as `scheme://host/request_uri`, dropping any `#fragment`.
///
/// The SDK never inspects request state itself; web handlers pass what their framework
/// already parsed.
pub fn page_url(https: bool, host: &str, request_uri: &str) -> String {
	let scheme = if https { "https" } else { "http" };
	let request_uri = request_uri.split_once('#').map_or(request_uri, |(head, _)| head);

	if request_uri.is_empty() || request_uri.starts_with('/') {
		format!("{scheme}://{host}{request_uri}")
	} else {
		format!("{scheme}://{host}/{request_uri}")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rebuilds_url_from_parts() {
		assert_eq!(
			page_url(true, "example.com", "/share?id=1"),
			"https://example.com/share?id=1"
		);
		assert_eq!(page_url(false, "example.com:8080", "/"), "http://example.com:8080/");
		assert_eq!(page_url(true, "example.com", "page"), "https://example.com/page");
	}

	#[test]
	fn drops_fragment() {
		assert_eq!(
			page_url(true, "example.com", "/spa?x=1#/route/2"),
			"https://example.com/spa?x=1"
		);
	}
}
