/// Declares a device interface and its remote implementation.
///
/// Each method is annotated with its Alpaca resource name, HTTP verb and,
/// for movement commands, `tier = Long`. `via = Type` decodes the response
/// as `Type` and converts it into the declared return type; on parameters it
/// converts the argument with `Type::try_from` before encoding and fails the
/// call without a request if that conversion fails.
macro_rules! device_interface {
    (@tier) => {
        $crate::config::TimeoutTier::Standard
    };

    (@tier $tier:ident) => {
        $crate::config::TimeoutTier::$tier
    };

    (@decode $return_type:ty) => {
        <$return_type as $crate::errors::ResultOk>::Ok
    };

    (@decode $return_type:ty, $via:ty) => {
        $via
    };

    (@param $param:ident) => {
        $param
    };

    (@param $param:ident, $via:ty) => {
        <$via>::try_from($param)?
    };

    (
        $(#[doc = $trait_doc:literal])*
        $pub:vis trait $trait_name:ident: Device {
            $(
                $(#[doc = $doc:literal])*
                #[http($path:literal, method = $method:ident $(, tier = $tier:ident)? $(, via = $via:ty)?)]
                async fn $method_name:ident(
                    &self $(, #[http($param_name:literal $(, via = $param_via:ty)?)] $param:ident: $param_ty:ty)* $(,)?
                ) -> $return_type:ty;
            )*
        }
    ) => {
        $(#[doc = $trait_doc])*
        #[async_trait::async_trait]
        $pub trait $trait_name: $crate::api::Device {
            $(
                $(#[doc = $doc])*
                ///
                #[doc = concat!("Alpaca: `", stringify!($method), " ", $path, "`.")]
                async fn $method_name(&self $(, $param: $param_ty)*) -> $return_type;
            )*
        }

        impl $crate::api::DeviceKind for dyn $trait_name {
            const TYPE: $crate::api::DeviceType = $crate::api::DeviceType::$trait_name;
        }

        #[async_trait::async_trait]
        impl $trait_name for $crate::api::DeviceAdapter<dyn $trait_name> {
            $(
                async fn $method_name(&self $(, $param: $param_ty)*) -> $return_type {
                    #[allow(unused_mut)]
                    let mut params = $crate::params::Params::new();
                    $(
                        params.insert($param_name, device_interface!(@param $param $(, $param_via)?));
                    )*

                    self.exec::<device_interface!(@decode $return_type $(, $via)?)>(
                        $crate::client::Method::$method,
                        $path,
                        params,
                        device_interface!(@tier $($tier)?),
                    )
                    .await
                    $(.map(<$via>::into))?
                }
            )*
        }
    };
}
