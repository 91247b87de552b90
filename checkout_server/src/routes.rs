//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use checkout_engine::{db_types::OrderId, traits::CheckoutDatabase, AccountApi, OrderFlowApi};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{CreatePaymentRequest, CreatePaymentResponse, OrderStatusResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_payment => Post "/create-payment" impl CheckoutDatabase);
/// Route handler for the checkout endpoint
///
/// Creates an order for the user named in the access token and approves it straight away. The response carries the
/// new order id, which the storefront then polls at `/api/order-status/{orderId}`.
///
/// Sale notifications are sent in the background and never delay or fail this request.
pub async fn create_payment<B: CheckoutDatabase>(
    claims: JwtClaims,
    body: web::Json<CreatePaymentRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST create-payment for user {}", claims.id);
    let order = api.create_order(&claims.id, body.into_inner().into()).await?;
    let response = CreatePaymentResponse {
        order_id: order.id,
        message: "Payment approved (simulated). Your order has been created.".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

route!(order_status => Get "/order-status/{order_id}" impl CheckoutDatabase);
/// The status of any order, by id. No authentication is needed; order ids are unguessable.
pub async fn order_status<B: CheckoutDatabase>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::from_str(&path.into_inner()).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    trace!("💻️ GET order-status for {order_id}");
    let status = api.order_status(&order_id).await?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse { status }))
}

//----------------------------------------------   History  ----------------------------------------------------
route!(my_orders => Get "/my-orders" impl CheckoutDatabase);
/// The orders placed by the user named in the access token, newest first.
pub async fn my_orders<B: CheckoutDatabase>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my-orders for user {}", claims.id);
    let orders = api.orders_for_user(&claims.id).await?;
    Ok(HttpResponse::Ok().json(orders))
}
