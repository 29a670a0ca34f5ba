use std::fs;

use vocabulary::{
    sink::{CsvSink, MemorySink, AUTO_STOPWORDS_FILE, KEEP_FILE, LOOKUP_FILE},
    Config, Document, Lexicon, Pipeline, Result,
};

fn config(threshold: usize) -> Config {
    Config {
        builtin_stopwords: false,
        stopword_threshold: threshold,
        ..Config::default()
    }
}

fn insert(id: &str, body: &str) -> Document {
    Document::new(
        id,
        format!("Insert {}", id),
        Some(format!(
            r#"<html><body>
                <div class="MonTitle">Praeparat</div>
                <div class="ownerCompany">Hersteller AG</div>
                {}
                <div id="section18">Packungen Zulassungsnummer</div>
                <p class="footer">Stand der Information</p>
            </body></html>"#,
            body
        )),
    )
}

fn ok(documents: Vec<Document>) -> impl Iterator<Item = Result<Document>> {
    documents.into_iter().map(Ok)
}

fn run(pipeline: &Pipeline, documents: Vec<Document>) -> MemorySink {
    let mut sink = MemorySink::default();
    pipeline.run(ok(documents), &mut sink).unwrap();
    sink
}

#[test]
fn frequent_terms_become_auto_stopwords() {
    let pipeline = Pipeline::new(&config(1), Lexicon::default()).unwrap();
    let sink = run(
        &pipeline,
        vec![
            insert("D1", "<p>Kopfschmerzen Fieber</p>"),
            insert("D2", "<p>Kopfschmerzen</p>"),
        ],
    );

    assert_eq!(sink.keep, vec![("Fieber".to_owned(), "D1".to_owned())]);
    assert_eq!(sink.auto_stopwords, vec![("Kopfschmerzen".to_owned(), 2)]);
    assert!(sink.lookup.is_empty());
    assert!(sink.finished);
}

#[test]
fn documents_are_listed_once_per_term() {
    let pipeline = Pipeline::new(&config(10), Lexicon::default()).unwrap();
    let sink = run(
        &pipeline,
        vec![
            insert("D1", "<p>Schwindel, Schwindel und nochmals Schwindel</p>"),
            insert("D2", "<p>Schwindel</p>"),
        ],
    );

    let schwindel = sink
        .keep
        .iter()
        .find(|(term, _)| term == "Schwindel")
        .map(|(_, association)| association.as_str());
    assert_eq!(schwindel, Some("D1|D2"));
}

#[test]
fn chapters_are_attached_to_entries() {
    let pipeline = Pipeline::new(&config(10), Lexicon::default()).unwrap();
    let sink = run(
        &pipeline,
        vec![
            insert(
                "12345, 67890",
                r#"<div id="section4">Kopfschmerzen</div><div id="Section7050">Kopfschmerzen Fieber</div>"#,
            ),
            insert("54321", "<p>Kopfschmerzen</p>"),
        ],
    );

    assert_eq!(
        sink.keep,
        vec![
            ("Fieber".to_owned(), "12345(7050)".to_owned()),
            ("Kopfschmerzen".to_owned(), "12345(4,7050)|54321".to_owned()),
        ]
    );
}

#[test]
fn boilerplate_never_reaches_the_index() {
    let pipeline = Pipeline::new(&config(10), Lexicon::default()).unwrap();
    let sink = run(&pipeline, vec![insert("D1", "<p>Nebenwirkungen</p>")]);

    let terms = sink
        .keep
        .iter()
        .map(|(term, _)| term.as_str())
        .collect::<Vec<_>>();
    assert_eq!(terms, vec!["Nebenwirkungen"]);
}

#[test]
fn broken_documents_contribute_nothing() {
    let pipeline = Pipeline::new(&config(1), Lexicon::default()).unwrap();
    let healthy = vec![
        insert("D1", "<p>Kopfschmerzen Fieber</p>"),
        insert("D2", "<p>Kopfschmerzen</p>"),
    ];

    let mut with_broken = healthy.clone();
    with_broken.insert(
        1,
        Document::new(
            "D3",
            "No owner",
            Some(r#"<div class="MonTitle">X</div><p>Fieber Husten</p>"#.to_owned()),
        ),
    );

    let (expected, _) = pipeline.index(ok(healthy)).unwrap();
    let (actual, report) = pipeline.index(ok(with_broken)).unwrap();

    assert_eq!(actual, expected);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.processed, 2);
}

#[test]
fn whitelist_and_phrases_survive_any_threshold() {
    let lexicon = Lexicon {
        whitelist: ["Tabletten".to_owned()].into_iter().collect(),
        ..Lexicon::default()
    }
    .with_multiwords(vec!["akute Leukämie".to_owned()]);

    let pipeline = Pipeline::new(&config(0), lexicon).unwrap();
    let sink = run(
        &pipeline,
        vec![
            insert("D1", "<p>Tabletten gegen akute Leukämie</p>"),
            insert("D2", "<p>Tabletten und Kapseln</p>"),
        ],
    );

    assert_eq!(
        sink.keep,
        vec![
            ("Tabletten".to_owned(), "D1|D2".to_owned()),
            ("akute Leukämie".to_owned(), "D1".to_owned()),
        ]
    );
    assert_eq!(
        sink.auto_stopwords,
        vec![("Kapseln".to_owned(), 1), ("gegen".to_owned(), 1)]
    );
}

#[test]
fn phrases_changed_by_normalisation_are_kept() {
    let lexicon = Lexicon::default().with_multiwords(vec!["Morbus Crohn’s".to_owned()]);
    let pipeline = Pipeline::new(&config(0), lexicon).unwrap();
    let sink = run(&pipeline, vec![insert("D1", "<p>bei Morbus Crohn’s</p>")]);

    assert_eq!(
        sink.keep,
        vec![("Morbus Crohns".to_owned(), "D1".to_owned())]
    );
    assert!(sink.auto_stopwords.is_empty());
}

#[test]
fn stripped_sections_add_no_chapters() {
    let pipeline = Pipeline::new(&config(10), Lexicon::default()).unwrap();
    let sink = run(
        &pipeline,
        vec![insert(
            "D1",
            r#"<div id="section4">Kopfschmerzen</div>
               <div id="section18"><div id="section181">Kopfschmerzen</div></div>"#,
        )],
    );

    assert_eq!(
        sink.keep,
        vec![("Kopfschmerzen".to_owned(), "D1(4)".to_owned())]
    );
}

#[test]
fn csv_output_is_deterministic() {
    let documents = (0..40)
        .map(|i| {
            insert(
                &format!("{:05}", i),
                &format!(
                    r#"<div id="section{}">Kopfschmerzen Übelkeit Wirkstoff{} Schwindel</div>"#,
                    i % 7,
                    i % 5
                ),
            )
        })
        .collect::<Vec<_>>();

    let mut outputs = Vec::new();
    for batch_size in [1, 3, 256] {
        let config = Config {
            batch_size,
            lookup: true,
            ..config(20)
        };
        let pipeline = Pipeline::new(&config, Lexicon::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::create(dir.path(), true).unwrap();
        pipeline.run(ok(documents.clone()), &mut sink).unwrap();

        let files = [KEEP_FILE, AUTO_STOPWORDS_FILE, LOOKUP_FILE]
            .iter()
            .map(|name| fs::read_to_string(dir.path().join(name)).unwrap())
            .collect::<Vec<_>>();
        outputs.push(files);
    }

    assert!(!outputs[0][0].is_empty());
    assert!(!outputs[0][1].is_empty());
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}
