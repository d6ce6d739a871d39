use limit_book::application::services::{BookHandle, BookService, ServiceError};
use limit_book::domain::{
    Book, Depth, DepthPoint, Fixed, Order, OrderRef, OrderValidator, OrderedSide, Side,
    ValidationConfig, ValidationError,
};
use tokio::sync::mpsc;

fn fx(value: i64) -> Fixed {
    Fixed::from_ratio(value, 1)
}

#[tokio::test]
async fn test_handle_trade_and_queries() {
    let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new()).unwrap();

    assert_eq!(handle.trade(Order::bid(1, fx(10), fx(100))).await.unwrap(), None);
    assert_eq!(handle.trade(Order::bid(2, fx(15), fx(100))).await.unwrap(), None);
    assert_eq!(handle.middle_price().await.unwrap(), fx(10));

    let fills = handle
        .trade(Order::ask(3, fx(12), fx(150)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].filled, fx(100));
    assert_eq!(fills[0].money, fx(1000));
    assert_eq!(handle.last_price().await.unwrap(), fx(10));

    assert_eq!(
        handle.depth(5).await.unwrap(),
        Depth {
            asks: vec![DepthPoint { price: fx(12), amount: fx(50) }],
            bids: vec![DepthPoint { price: fx(15), amount: fx(100) }],
        }
    );

    let dump = handle.dump().await.unwrap();
    assert!(dump.starts_with("asks (1):\n"));

    drop(handle);
    let book = owner.join().unwrap();
    assert_eq!(book.asks().first().map(|o| o.id.0), Some(3));
}

#[tokio::test]
async fn test_handle_cancel() {
    let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new()).unwrap();

    let order = Order::ask(7, fx(20), fx(5));
    handle.trade(order.clone()).await.unwrap();

    assert_eq!(handle.cancel(order.reference()).await.unwrap(), Some(order.clone()));
    assert_eq!(handle.cancel(order.reference()).await.unwrap(), None);
    assert_eq!(
        handle.cancel(OrderRef::new(8, Side::Bid, fx(20))).await.unwrap(),
        None
    );

    drop(handle);
    let book = owner.join().unwrap();
    assert!(book.asks().is_empty());
}

#[tokio::test]
async fn test_rejected_orders_leave_book_untouched() {
    let config = ValidationConfig {
        max_amount: fx(10),
        ..ValidationConfig::default()
    };
    let (handle, owner) =
        BookService::spawn(Book::new(), OrderValidator::with_config(config)).unwrap();

    let result = handle.trade(Order::bid(1, fx(10), fx(11))).await;
    assert!(matches!(
        result,
        Err(ServiceError::Rejected(ValidationError::AmountOutOfRange { .. }))
    ));

    let result = handle.trade(Order::bid(2, fx(10), Fixed::ZERO)).await;
    assert!(matches!(
        result,
        Err(ServiceError::Rejected(ValidationError::NonPositiveAmount(_)))
    ));

    assert_eq!(handle.depth(10).await.unwrap(), Depth::default());

    drop(handle);
    let book = owner.join().unwrap();
    assert!(book.bids().is_empty());
}

#[tokio::test]
async fn test_concurrent_handles_share_one_book() {
    let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new()).unwrap();

    let mut tasks = Vec::new();
    for worker in 0..4u64 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..25u64 {
                let id = worker * 100 + i + 1;
                handle.trade(Order::bid(id, fx(10), fx(1))).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(
        handle.depth(1).await.unwrap().bids,
        vec![DepthPoint {
            price: fx(10),
            amount: fx(100),
        }]
    );

    drop(handle);
    let book = owner.join().unwrap();
    assert_eq!(book.resting(Side::Bid), 100);
}

#[tokio::test]
async fn test_oversized_notional_keeps_owner_alive() {
    let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new()).unwrap();
    let big = fx(100_000);

    handle.trade(Order::ask(1, big, big)).await.unwrap();
    let fills = handle.trade(Order::bid(2, big, big)).await.unwrap().unwrap();
    assert_eq!(fills[0].filled, big);

    // 拥有线程仍在处理请求
    assert_eq!(handle.last_price().await.unwrap(), big);
    assert_eq!(handle.depth(10).await.unwrap(), Depth::default());

    drop(handle);
    let book = owner.join().unwrap();
    assert_eq!(book.resting(Side::Ask) + book.resting(Side::Bid), 0);
}

#[tokio::test]
async fn test_closed_service_reports_closed() {
    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    let handle = BookHandle::new(command_sender);
    drop(command_receiver);

    assert!(matches!(handle.middle_price().await, Err(ServiceError::Closed)));
    assert!(matches!(
        handle.trade(Order::bid(1, fx(10), fx(1))).await,
        Err(ServiceError::Closed)
    ));
}

#[tokio::test]
async fn test_owner_returns_book_after_last_handle_drops() {
    let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new()).unwrap();
    let survivor = handle.clone();
    drop(handle);

    // 仍有句柄存活，服务继续运行
    survivor.trade(Order::ask(1, fx(3), fx(2))).await.unwrap();
    assert_eq!(survivor.middle_price().await.unwrap(), fx(3));

    drop(survivor);
    let book = owner.join().unwrap();
    assert_eq!(book.resting(Side::Ask), 1);
}
