//! End-to-end catalog behavior over the full pipeline:
//! provider → loader → index → query.

use cardex_core::{
    CatalogBuilder, CatalogIndex, ContentId, FsSourceProvider, IndexCache, ModuleSource,
    StaticSourceProvider, WarningKind, loader,
};

fn corpus() -> Vec<ModuleSource> {
    vec![
        ModuleSource::new(
            "docker",
            "introduccion",
            "<h1>¿Qué es Docker?</h1>\
             <p>Docker empaqueta aplicaciones en contenedores.</p>\
             <pre><code class=\"language-bash\">docker run hello-world</code></pre>",
        ),
        ModuleSource::new(
            "docker",
            "volumenes",
            "<h1>Volúmenes</h1>\
             <h2>Persistencia</h2>\
             <p>Los volúmenes de docker persisten datos.</p>",
        ),
        ModuleSource::new(
            "errores",
            "manejo-errores-tradicional",
            "<h1>Manejo de Errores</h1>\
             <div class=\"info-box\">Nota sobre excepciones.</div>\
             <pre><code class=\"language-php\">echo 1;</code></pre>",
        ),
        ModuleSource::new(
            "errores",
            "excepciones",
            "<h2>Excepciones en PHP</h2><p>try, catch y finally.</p>",
        ),
    ]
}

#[tokio::test]
async fn full_pipeline_serves_lookups_listings_and_search() {
    let builder = CatalogBuilder::new(Box::new(StaticSourceProvider::new(corpus())));
    let report = builder.refresh().await.expect("refresh");

    assert_eq!(report.unit_count, 4);
    assert_eq!(report.topic_count, 2);
    assert!(report.warnings.is_empty());

    let query = builder.query().expect("query");

    // Exact lookup with parsed structure.
    let unit = query
        .get_by_id(&ContentId::new("errores", "manejo-errores-tradicional"))
        .expect("unit");
    assert_eq!(unit.headings.len(), 1);
    assert_eq!(unit.headings[0].text, "Manejo de Errores");
    assert_eq!(unit.headings[0].anchor, "manejo-de-errores");
    assert_eq!(unit.code_blocks.len(), 1);
    assert_eq!(unit.code_blocks[0].language, "php");
    assert_eq!(unit.code_blocks[0].text, "echo 1;");
    assert_eq!(unit.callouts.len(), 1);
    assert_eq!(unit.callouts[0].class, "info-box");

    // Raw HTML passes through unmodified for the rendering layer.
    assert!(unit.raw_html.contains("<div class=\"info-box\">"));

    // Topic listing in source order.
    let docker: Vec<_> = query
        .list_by_topic("docker")
        .iter()
        .map(|u| u.id.slug.clone())
        .collect();
    assert_eq!(docker, vec!["introduccion", "volumenes"]);

    // Search separates topics: docker queries never surface PHP units.
    let hits = query.search("docker", 20);
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.id.topic == "docker"));
    let hits = query.search("excepciones", 20);
    assert!(hits.iter().all(|h| h.id.topic == "errores"));

    // Unknown id is an absent value, not an error.
    assert!(query.get_by_id(&ContentId::new("nonexistent", "x")).is_none());
}

#[tokio::test]
async fn duplicate_ids_survive_as_exactly_one_unit_and_one_warning() {
    let mut sources = corpus();
    sources.push(ModuleSource::new(
        "docker",
        "volumenes",
        "<h1>Sombra</h1>",
    ));

    let builder = CatalogBuilder::new(Box::new(StaticSourceProvider::new(sources)));
    let report = builder.refresh().await.expect("refresh");

    assert_eq!(report.unit_count, 4);
    let dups: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::DuplicateSlug)
        .collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].id, ContentId::new("docker", "volumenes"));

    // First occurrence won.
    let query = builder.query().expect("query");
    let unit = query
        .get_by_id(&ContentId::new("docker", "volumenes"))
        .expect("unit");
    assert_eq!(unit.headings[0].text, "Volúmenes");
}

#[tokio::test]
async fn empty_unit_is_retrievable_with_warning() {
    let sources = vec![
        ModuleSource::new("docker", "stub", ""),
        ModuleSource::new("docker", "real", "<p>contenido</p>"),
    ];
    let builder = CatalogBuilder::new(Box::new(StaticSourceProvider::new(sources)));
    let report = builder.refresh().await.expect("refresh");

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::EmptyContent);

    let query = builder.query().expect("query");
    let stub = query
        .get_by_id(&ContentId::new("docker", "stub"))
        .expect("stub unit");
    assert!(stub.headings.is_empty());
    assert!(stub.code_blocks.is_empty());
    assert!(stub.plain_text.is_empty());
}

#[tokio::test]
async fn anchors_are_unique_within_every_unit() {
    let sources = vec![ModuleSource::new(
        "repetido",
        "anclas",
        "<h2>Uso</h2><h3>Uso</h3><h2>Uso 2</h2><h2>Uso</h2>",
    )];
    let builder = CatalogBuilder::new(Box::new(StaticSourceProvider::new(sources)));
    builder.refresh().await.expect("refresh");

    let query = builder.query().expect("query");
    for unit in query.list_by_topic("repetido") {
        let mut anchors: Vec<_> = unit.headings.iter().map(|h| h.anchor.clone()).collect();
        let total = anchors.len();
        anchors.sort();
        anchors.dedup();
        assert_eq!(anchors.len(), total, "anchors must be unique per unit");
    }
}

#[test]
fn index_round_trip_answers_identically() {
    let snapshot = loader::load(&corpus()).expect("load");
    let index = CatalogIndex::build(&snapshot);

    let json = serde_json::to_string(&index).expect("serialize");
    let restored: CatalogIndex = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(index, restored);

    use cardex_core::QueryService;
    use std::sync::Arc;
    let fresh = QueryService::new(Arc::new(index));
    let cached = QueryService::new(Arc::new(restored));

    for query in ["docker", "errores excepciones", "volúmenes", "nada-que-ver"] {
        assert_eq!(fresh.search(query, 20), cached.search(query, 20));
    }
    let id = ContentId::new("docker", "volumenes");
    assert_eq!(fresh.get_by_id(&id), cached.get_by_id(&id));
    assert_eq!(
        fresh.list_by_topic("errores"),
        cached.list_by_topic("errores")
    );
}

#[tokio::test]
async fn fs_provider_feeds_the_full_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let topic = dir.path().join("despliegue");
    std::fs::create_dir(&topic).expect("mkdir");
    std::fs::write(
        topic.join("docker-compose.html"),
        "<h1>Docker Compose</h1><p>orquestación local</p>",
    )
    .expect("write");

    let cache_dir = tempfile::tempdir().expect("tempdir");
    let builder = CatalogBuilder::new(Box::new(FsSourceProvider::new(dir.path())))
        .with_cache(IndexCache::new(cache_dir.path()));

    let first = builder.refresh().await.expect("refresh");
    assert_eq!(first.unit_count, 1);
    assert!(!first.from_cache);

    // Unchanged corpus: second pass is served from the persisted cache and
    // answers identically.
    let second = builder.refresh().await.expect("refresh");
    assert!(second.from_cache);

    let query = builder.query().expect("query");
    let hits = query.search("compose", 20);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ContentId::new("despliegue", "docker-compose"));
    assert_eq!(hits[0].matched_headings, vec!["Docker Compose"]);
}
