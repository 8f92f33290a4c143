use mockito::Matcher;
use reqwest::blocking::Client;

use super::{search_github_repos_inner, search_url, SearchOutcome, SearchRequest};

fn json_repos(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{
      "name": "repo{i}",
      "full_name": "owner{i}/repo{i}",
      "stargazers_count": {stars},
      "owner": {{
        "login": "owner{i}",
        "avatar_url": "https://avatars.example.com/u/{i}"
      }}
    }}"#,
                i = i,
                stars = 1000 - i
            )
        })
        .collect();
    format!(
        r#"{{ "total_count": {}, "incomplete_results": false, "items": [{}] }}"#,
        n,
        items.join(",")
    )
}

fn request(query: &str, page: Option<u32>, per_page: Option<u32>) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        page,
        per_page,
    }
}

#[test]
fn url_encodes_query_and_sorts_by_stars() {
    let url = search_url("https://api.github.com/", &request("rust lang", None, None));
    assert_eq!(
        url,
        "https://api.github.com/search/repositories?q=rust%20lang&sort=stars"
    );

    let url = search_url("http://h", &request("x", Some(3), Some(9)));
    assert_eq!(url, "http://h/search/repositories?q=x&sort=stars&page=3&per_page=9");
}

#[test]
fn sends_paging_params_and_maps_fields() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rails".into()),
            Matcher::UrlEncoded("sort".into(), "stars".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "9".into()),
        ]))
        .match_header("user-agent", "ua-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json_repos(2))
        .create();

    let out = search_github_repos_inner(
        &Client::new(),
        &server.url(),
        "ua-test",
        &request("rails", Some(2), Some(9)),
    )
    .unwrap();
    m.assert();

    let SearchOutcome::Found(page) = out else {
        panic!("expected results, got {out:?}");
    };
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, Some(2));
    assert_eq!(page.items[0].name, "repo0");
    assert_eq!(page.items[0].owner_login, "owner0");
    assert_eq!(page.items[0].owner_avatar_url, "https://avatars.example.com/u/0");
    assert_eq!(page.items[0].stars, 1000);
    assert_eq!(page.items[1].repo_url(), "https://github.com/owner1/repo1");
    assert_eq!(page.items[1].owner_url(), "https://github.com/owner1");
}

#[test]
fn unprocessable_is_not_an_error() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(422)
        .with_body(r#"{"message":"Validation Failed"}"#)
        .create();

    let out =
        search_github_repos_inner(&Client::new(), &server.url(), "t", &request("x", None, None))
            .unwrap();
    assert_eq!(out, SearchOutcome::Unprocessable);
}

#[test]
fn empty_items_is_found_with_nothing() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json_repos(0))
        .create();

    let out =
        search_github_repos_inner(&Client::new(), &server.url(), "t", &request("zzz", None, None))
            .unwrap();
    match out {
        SearchOutcome::Found(page) => assert!(page.items.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn http_error_has_context() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("oops")
        .create();

    let err =
        search_github_repos_inner(&Client::new(), &server.url(), "t", &request("x", None, None))
            .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("GitHub search returned error"), "{msg}");
}

#[test]
fn bad_json_has_context() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let err =
        search_github_repos_inner(&Client::new(), &server.url(), "t", &request("x", None, None))
            .unwrap_err();
    assert!(format!("{:#}", err).contains("parse GitHub response"));
}
