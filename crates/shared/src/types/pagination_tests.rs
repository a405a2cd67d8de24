use super::*;
use rstest::rstest;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 15);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest {
        page: 1,
        per_page: 20,
    };
    assert_eq!(request.offset(), 0);

    let request = PageRequest {
        page: 2,
        per_page: 20,
    };
    assert_eq!(request.offset(), 20);
}

#[test]
fn test_page_request_normalized() {
    let request = PageRequest {
        page: 0,
        per_page: 1000,
    }
    .normalized();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, MAX_PER_PAGE);
    assert_eq!(request.offset(), 0);
}

#[test]
fn test_page_request_limit() {
    let request = PageRequest {
        page: 1,
        per_page: 50,
    };
    assert_eq!(request.limit(), 50);
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), 1, 10, 3);

    assert_eq!(response.data, data);
    assert_eq!(response.meta.page, 1);
    assert_eq!(response.meta.per_page, 10);
    assert_eq!(response.meta.total, 3);
    assert_eq!(response.meta.total_pages, 1);
}

#[rstest]
#[case(25, 10, 3)]
#[case(20, 10, 2)]
#[case(1, 15, 1)]
#[case(0, 10, 1)]
fn test_page_response_total_pages(#[case] total: u64, #[case] per_page: u32, #[case] pages: u64) {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, per_page, total);
    assert_eq!(response.meta.total_pages, pages);
}

#[test]
fn test_page_response_map() {
    let response = PageResponse::new(vec![1, 2], 1, 10, 2).map(|n| n * 10);
    assert_eq!(response.data, vec![10, 20]);
    assert_eq!(response.meta.total, 2);
}
