//! Conversion engine
//!
//! Parses the source document on the blocking pool and writes the converted
//! output into a bounded channel in chunks of at most `chunk_bytes`. The
//! response body reads from the other end, so a slow client slows the parser
//! down and a client that goes away stops it.

use super::serialization::{parse_base_iri, read_quads, writer_for};
use super::{ConvertError, ConvertResult, FormatRegistry, RdfFormat};
use crate::config::TransformConfig;
use crate::serve::{ByteStream, SourceReader, TransformJob, Transformer};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::io::{self, BufReader, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

type ChunkSender = mpsc::Sender<Result<Bytes, ConvertError>>;

/// RDF conversion engine over the `rio` parsers and formatters
pub struct RdfEngine {
    registry: FormatRegistry,
    options: TransformConfig,
}

impl RdfEngine {
    /// Create an engine over a format table
    pub fn new(registry: FormatRegistry, options: TransformConfig) -> Self {
        Self { registry, options }
    }

    fn format_of(&self, content_type: &str) -> ConvertResult<RdfFormat> {
        self.registry
            .format_of(content_type)
            .ok_or_else(|| ConvertError::UnknownContentType(content_type.to_string()))
    }
}

impl Default for RdfEngine {
    fn default() -> Self {
        Self::new(FormatRegistry::new(), TransformConfig::default())
    }
}

#[async_trait]
impl Transformer for RdfEngine {
    fn source_content_type(&self, path: &Path) -> Option<String> {
        self.registry.content_type_for_path(path).map(str::to_string)
    }

    async fn allowed_destinations(&self, source_content_type: &str) -> Vec<String> {
        self.registry.destinations(source_content_type)
    }

    fn convert(&self, input: SourceReader, job: TransformJob) -> ByteStream {
        let (tx, rx) = mpsc::channel(self.options.channel_depth.max(1));
        let formats = self
            .format_of(&job.source_content_type)
            .and_then(|from| Ok((from, self.format_of(&job.destination_content_type)?)));
        let chunk_bytes = self.options.chunk_bytes.max(1);

        tokio::task::spawn_blocking(move || {
            let mut output = ChannelWriter::new(tx.clone(), chunk_bytes);
            let result = formats
                .and_then(|(from, to)| run_conversion(input, from, to, &job, &mut output))
                .and_then(|()| output.finish());

            match result {
                Ok(()) => debug!(
                    "Converted {:?} from {} to {}",
                    job.source, job.source_content_type, job.destination_content_type
                ),
                Err(e) if e.is_disconnect() => {
                    debug!("Client went away, abandoning conversion of {:?}", job.source)
                }
                Err(e) => {
                    warn!("Conversion of {:?} failed: {}", job.source, e);
                    let _ = tx.blocking_send(Err(e));
                }
            }
        });

        ReceiverStream::new(rx).boxed()
    }
}

fn run_conversion(
    mut input: SourceReader,
    from: RdfFormat,
    to: RdfFormat,
    job: &TransformJob,
    output: &mut ChannelWriter,
) -> ConvertResult<()> {
    // Identity conversions return the original bytes untouched
    if job
        .source_content_type
        .eq_ignore_ascii_case(&job.destination_content_type)
    {
        io::copy(&mut input, output)?;
        return Ok(());
    }

    let base_iri = parse_base_iri(&job.base_iri)?;
    let mut sink = writer_for(to, &mut *output)?;
    read_quads(from, BufReader::new(input), Some(base_iri), &mut |quad| sink.write_quad(quad))?;
    sink.finish()
}

/// `Write` adapter cutting output into chunks on a bounded channel
struct ChannelWriter {
    tx: ChunkSender,
    buffer: Vec<u8>,
    chunk_bytes: usize,
}

impl ChannelWriter {
    fn new(tx: ChunkSender, chunk_bytes: usize) -> Self {
        Self {
            tx,
            buffer: Vec::with_capacity(chunk_bytes),
            chunk_bytes,
        }
    }

    fn send(&self, chunk: Vec<u8>) -> io::Result<()> {
        self.tx
            .blocking_send(Ok(Bytes::from(chunk)))
            .map_err(|_| closed())
    }

    /// Send every full chunk, keeping the remainder buffered
    fn send_full_chunks(&mut self) -> io::Result<()> {
        while self.buffer.len() >= self.chunk_bytes {
            let chunk: Vec<u8> = self.buffer.drain(..self.chunk_bytes).collect();
            self.send(chunk)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> ConvertResult<()> {
        self.send_full_chunks()?;
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.send(rest)?;
        }
        Ok(())
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.tx.is_closed() {
            return Err(closed());
        }
        self.buffer.extend_from_slice(data);
        self.send_full_chunks()?;
        Ok(data.len())
    }

    // Chunks are only cut by size so the first one is as large as configured
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response stream closed")
}
