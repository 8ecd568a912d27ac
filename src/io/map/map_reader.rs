//! .MAP reader: walks the file page by page and routes each page to its
//! decoder.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tabmap::io::map::MapReader;
//!
//! let map = MapReader::from_file("roads.map")?.read()?;
//! for record in map.records() {
//!     println!("{:?} #{}", record.shape_type, record.id);
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{MapError, Result};
use crate::notification::{NotificationCollection, NotificationType};

use super::block::MapBlock;
use super::constants::{BlockType, BLOCK_SIZE};
use super::header_block::MapHeader;
use super::index_block::IndexBlock;
use super::index_tree::IndexTree;
use super::map_file::MapFile;
use super::object_block::ObjectBlock;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the .MAP reader.
#[derive(Debug, Clone, Default)]
pub struct MapReaderConfiguration {
    /// When `true`, a page that fails to decode is reported as a
    /// notification instead of aborting the read.
    ///
    /// Header errors (including a bad magic cookie) are always fatal.
    ///
    /// Default: `false` (strict mode).
    pub failsafe: bool,

    /// In failsafe mode, keep reading the pages after a failed one. When
    /// `false`, reading stops at the first failed page and everything
    /// decoded before it is returned.
    pub skip_invalid_blocks: bool,
}

// ---------------------------------------------------------------------------
// MapReader
// ---------------------------------------------------------------------------

/// .MAP file reader, producing a [`MapFile`].
///
/// The read pipeline is:
///
/// 1. Load the whole stream; pages are 512 bytes each.
/// 2. Decode the header from page 0.
/// 3. For version 500 and later, apply page 1 as the affine extension.
/// 4. Classify every following page by its tag byte:
///    - index pages become nodes of the [`IndexTree`], keyed by offset
///    - object pages are merged into one [`ObjectBlock`] in arrival order
///    - coordinate, garbage and tool pages are noted and skipped
pub struct MapReader<R: Read + Seek> {
    /// Underlying byte stream.
    reader: R,

    /// User configuration.
    config: MapReaderConfiguration,

    /// Notifications collected during reading.
    notifications: NotificationCollection,
}

impl MapReader<BufReader<File>> {
    /// Open a .MAP file by path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read + Seek> MapReader<R> {
    /// Create a reader over any seekable byte stream.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            config: MapReaderConfiguration::default(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: MapReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read and decode the whole file.
    pub fn read(mut self) -> Result<MapFile> {
        self.reader.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;

        let mut pages = bytes.chunks(BLOCK_SIZE).enumerate().map(|(i, page)| {
            ((i * BLOCK_SIZE) as u64, page)
        });

        // Step 1: header. Nothing else can be interpreted without it.
        let (_, first) = pages
            .next()
            .ok_or_else(|| MapError::InvalidFormat("empty .MAP file".into()))?;
        let mut header = MapHeader::from_page(first.to_vec())?;

        let mut index = IndexTree::new();
        let mut objects: Option<ObjectBlock> = None;

        // Step 2: affine extension page.
        if header.has_extension_page() {
            match pages.next() {
                Some((offset, page)) => {
                    let result = header.append_affine_page(page.to_vec());
                    if !self.recover(offset, "affine extension", result)? {
                        return Ok(self.finish(header, index, objects));
                    }
                }
                None => self.notifications.notify(
                    NotificationType::Warning,
                    format!(
                        "version {} header has no affine extension page",
                        header.version
                    ),
                ),
            }
        }

        // Step 3: remaining pages.
        for (offset, page) in pages {
            if page.len() < BLOCK_SIZE {
                self.notifications.notify_at(
                    NotificationType::Warning,
                    offset,
                    format!("short trailing page of {} byte(s)", page.len()),
                );
            }

            let keep_going = match MapBlock::classify(page) {
                BlockType::Index => match arena_key(offset) {
                    Some(key) => {
                        let result = IndexBlock::from_page(offset, page.to_vec())
                            .map(|node| index.insert(key, node));
                        self.recover(offset, "index block", result)?
                    }
                    None => {
                        self.notifications.notify_at(
                            NotificationType::Warning,
                            offset,
                            "index block beyond the int32 offset range skipped",
                        );
                        true
                    }
                },
                BlockType::Object => {
                    let result = match objects.as_mut() {
                        Some(block) => block.extend(page.to_vec()),
                        None => ObjectBlock::from_page(offset, page.to_vec())
                            .map(|block| objects = Some(block)),
                    };
                    self.recover(offset, "object block", result)?
                }
                kind @ (BlockType::Coordinate | BlockType::Garbage | BlockType::Tool) => {
                    self.notifications.notify_at(
                        NotificationType::NotImplemented,
                        offset,
                        format!("{} block skipped", kind.name()),
                    );
                    true
                }
                BlockType::Header | BlockType::Raw => {
                    self.notifications.notify_at(
                        NotificationType::NotSupported,
                        offset,
                        format!("page with tag {} skipped", page.first().copied().unwrap_or(0)),
                    );
                    true
                }
            };

            if !keep_going {
                break;
            }
        }

        Ok(self.finish(header, index, objects))
    }

    /// Apply the failure policy to one page's decode result.
    ///
    /// Returns whether reading should continue with the next page.
    fn recover(&mut self, offset: u64, what: &str, result: Result<()>) -> Result<bool> {
        let err = match result {
            Ok(()) => return Ok(true),
            Err(err) => err,
        };

        if !self.config.failsafe || !err.is_block_local() {
            return Err(err);
        }

        self.notifications
            .notify_at(NotificationType::Error, offset, format!("{what}: {err}"));
        Ok(self.config.skip_invalid_blocks)
    }

    fn finish(
        self,
        header: MapHeader,
        index: IndexTree,
        objects: Option<ObjectBlock>,
    ) -> MapFile {
        MapFile {
            header,
            index,
            objects,
            notifications: self.notifications,
        }
    }
}

/// Arena key of a page; index entries address children by int32 offset.
fn arena_key(offset: u64) -> Option<i32> {
    i32::try_from(offset).ok()
}
