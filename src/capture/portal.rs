//! Full-screen capture through the freedesktop Screenshot portal (ashpd)

use std::path::PathBuf;

use anyhow::{Context, bail};
use ashpd::desktop::ResponseError;
use ashpd::desktop::screenshot::Screenshot;

use super::image::ScreenshotImage;

/// Take a screenshot of the whole desktop.
///
/// The first request is non-interactive. GNOME answers it with `Other` when no
/// screenshot permission is stored yet; the request is then repeated with
/// `interactive=true`, which shows the confirmation dialog and grants it.
pub async fn capture_screen() -> anyhow::Result<ScreenshotImage> {
    let uri = match request_uri(false).await {
        Err(err) if needs_interactive_retry(&err) => {
            log::info!("portal: non-interactive request refused, asking interactively");
            request_uri(true).await
        }
        other => other,
    }
    .map_err(describe_portal_error)?;

    let file = uri_to_path(&uri)?;
    log::info!("portal: loading image from {}", file.display());

    let image = tokio::task::spawn_blocking(move || {
        let image = ScreenshotImage::open(&file);
        if let Err(err) = std::fs::remove_file(&file) {
            log::debug!("Could not remove portal file {}: {}", file.display(), err);
        }
        image
    })
    .await
    .context("Screenshot loading task failed")??;

    log::info!("portal: captured {}x{}", image.width(), image.height());
    Ok(image)
}

async fn request_uri(interactive: bool) -> Result<String, ashpd::Error> {
    log::info!("portal: sending screenshot request (interactive={interactive})");
    let response = Screenshot::request()
        .interactive(interactive)
        .modal(false)
        .send()
        .await?
        .response()?;
    Ok(response.uri().to_string())
}

/// A refused quiet request is worth one interactive attempt
pub fn needs_interactive_retry(err: &ashpd::Error) -> bool {
    matches!(err, ashpd::Error::Response(ResponseError::Other))
}

fn describe_portal_error(err: ashpd::Error) -> anyhow::Error {
    match err {
        ashpd::Error::Response(ResponseError::Cancelled) => {
            anyhow::anyhow!("Screenshot was cancelled")
        }
        ashpd::Error::Response(ResponseError::Other) => {
            anyhow::anyhow!("Screenshot portal refused the request")
        }
        other => anyhow::anyhow!("Screenshot portal unavailable: {other}"),
    }
}

/// Resolve the `file://` uri handed back by the portal
pub fn uri_to_path(uri: &str) -> anyhow::Result<PathBuf> {
    let url = reqwest::Url::parse(uri).with_context(|| format!("Invalid screenshot uri {uri}"))?;
    if url.scheme() != "file" {
        bail!(
            "Portal returned unsupported URI scheme '{}' (expected file://)",
            url.scheme()
        );
    }
    url.to_file_path()
        .map_err(|_| anyhow::anyhow!("Portal URI is not a valid file path: {uri}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_refused_requests_are_retried() {
        assert!(needs_interactive_retry(&ashpd::Error::Response(
            ResponseError::Other
        )));
        assert!(!needs_interactive_retry(&ashpd::Error::Response(
            ResponseError::Cancelled
        )));
    }

    #[test]
    fn test_cancel_is_reported_as_such() {
        let err = describe_portal_error(ashpd::Error::Response(ResponseError::Cancelled));
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_uri_to_path_decodes_escapes() {
        let path = uri_to_path("file:///tmp/Screenshot%20from%20now.png").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/Screenshot from now.png"));
    }

    #[test]
    fn test_uri_to_path_rejects_other_schemes() {
        assert!(uri_to_path("https://example.com/shot.png").is_err());
        assert!(uri_to_path("not a uri").is_err());
    }
}
