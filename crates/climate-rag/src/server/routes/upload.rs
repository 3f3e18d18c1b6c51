//! PDF upload and index construction

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::{IngestPipeline, PdfParser};
use crate::retrieval::VectorIndex;
use crate::server::state::AppState;
use crate::session::IndexedDocument;
use crate::types::{
    response::{DocumentSummary, UploadResponse},
    Document,
};

/// POST /api/session/:id/upload - Upload and index a single PDF
///
/// The session's previous document, index, and transcript are replaced.
/// Any failure along the pipeline aborts this request; the stored file is
/// left on disk.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let session = state.sessions().get(&id)?;
    session.ensure_unlocked()?;

    // Take the first file field; the UI sends exactly one.
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;

        upload = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| {
        Error::Internal("No file field in upload request".to_string())
    })?;

    if !PdfParser::is_pdf_filename(&filename) {
        let ext = filename.rsplit('.').next().unwrap_or("").to_string();
        return Err(Error::UnsupportedFileType(ext));
    }

    tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

    // Persist the raw bytes under a collision-safe name. The spool is
    // append-only; nothing prunes it.
    let stored_filename = format!("{}.pdf", Uuid::new_v4().simple());
    let stored_path = state.config().storage.upload_dir.join(&stored_filename);
    tokio::fs::write(&stored_path, &data).await?;

    // Parse and chunk.
    let pipeline = IngestPipeline::new(&state.config().chunking);
    let parsed = pipeline.parse_pdf(&filename, &data)?;

    let mut doc = Document::new(
        filename.clone(),
        stored_filename,
        parsed.content_hash.clone(),
        data.len() as u64,
    );
    doc.total_pages = parsed.total_pages;

    let mut chunks = pipeline.create_chunks(&doc, &parsed);
    if chunks.is_empty() {
        return Err(Error::file_parse(
            &filename,
            "Document produced no indexable text chunks",
        ));
    }

    // Embed all chunks through the hosted API.
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = state.embedding_provider().embed_batch(&texts).await?;
    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    // Build the session index, replacing whatever was there.
    let chunk_count = chunks.len() as u32;
    let index = VectorIndex::build(chunks)?;
    doc.total_chunks = chunk_count;

    tracing::info!(
        "Indexed '{}': {} pages, {} chunks in {:.1}s",
        filename,
        doc.total_pages.unwrap_or(1),
        chunk_count,
        start.elapsed().as_secs_f64()
    );

    let summary = DocumentSummary::from(&doc);
    session.set_document(IndexedDocument {
        document: doc,
        index,
    });

    Ok(Json(UploadResponse {
        document: summary,
        chunks_created: chunk_count,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
