use mockito::{Matcher, Mock, ServerGuard};

/// Primary (OMDb-shaped) upstream answering 503 to everything.
pub async fn omdb_unavailable(server: &mut ServerGuard, expected_calls: usize) -> Mock {
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .expect(expected_calls)
        .create_async()
        .await
}

/// Secondary (TMDB-shaped) upstream with three movies; the first has a poster
/// hosted on the same mock under `/img`.
pub async fn tmdb_three_results(server: &mut ServerGuard, expected_calls: usize) -> Mock {
    server
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "heat".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"page":1,"results":[
                {"id":949,"title":"Heat","release_date":"1995-12-15","poster_path":"/heat.jpg","vote_average":7.9,"genre_ids":[28,80]},
                {"id":11,"title":"Heat Wave","release_date":"2009-01-01","poster_path":null,"vote_average":5.1,"genre_ids":[18]},
                {"id":12,"title":"In the Heat of the Night","release_date":"1967-08-02","poster_path":null,"vote_average":7.6,"genre_ids":[80]}
            ]}"#,
        )
        .expect(expected_calls)
        .create_async()
        .await
}
