use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::model::ImageFile;

/// Bytes needed to recognise every supported signature.
const SNIFF_LEN: u64 = 12;

/// Guesses a MIME type from the first bytes of a file.
pub fn sniff_mime(header: &[u8]) -> &'static str {
    match header {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Reads size and signature of the file at `path`.
pub async fn pick_file(path: &Path) -> io::Result<ImageFile> {
    let file = File::open(path).await?;
    let size = file.metadata().await?.len();
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut header).await?;
    Ok(ImageFile {
        path: path.to_path_buf(),
        size,
        mime_type: sniff_mime(&header).to_string(),
    })
}
