/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains the boot console writer, the `cprint!`/`cprintln!`
    macros and hex formatters for measurement dumps.

--*/
use core::convert::Infallible;
use ufmt::{uDisplay, uWrite, Formatter};

/// Boot console. Host builds print to stdout, firmware builds to the
/// PL011 UART when `pl011` is enabled and nowhere otherwise.
#[derive(Default)]
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    #[inline(never)]
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                print!("{s}");
            } else if #[cfg(feature = "pl011")] {
                crate::Uart::default().write(s);
            } else {
                let _ = s;
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! cprint {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwrite!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn write_hex<W>(f: &mut Formatter<'_, W>, bytes: &[u8]) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    for &b in bytes {
        f.write_char(HEX_DIGITS[usize::from(b >> 4)] as char)?;
        f.write_char(HEX_DIGITS[usize::from(b & 0xf)] as char)?;
    }
    Ok(())
}

/// Formats a byte slice as upper-case hex with no separators.
pub struct HexBytes<'a>(pub &'a [u8]);

impl uDisplay for HexBytes<'_> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        write_hex(f, self.0)
    }
}

/// Formats an address as `0x` followed by 16 hex digits.
pub struct HexAddr(pub u64);

impl uDisplay for HexAddr {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str("0x")?;
        write_hex(f, &self.0.to_be_bytes())
    }
}
